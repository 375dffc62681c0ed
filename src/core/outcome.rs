//! The closed set of outcomes a change attempt can produce.
//!
//! Every outcome borrows the store it came from, so follow-up operations
//! (`change`, `inspect`) can be chained directly on the result.

use super::reason::{AbsentValue, BoxError, ChangeError, ChangeFailure, Rejection, Veto};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ptr;

/// Tag identifying which outcome a [`ChangeResult`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    NotAllowed,
    Accepted,
    Adjusted,
    Rejected,
    Failed,
}

impl OutcomeKind {
    /// Every kind, in declaration order.
    pub const ALL: [OutcomeKind; 5] = [
        Self::NotAllowed,
        Self::Accepted,
        Self::Adjusted,
        Self::Rejected,
        Self::Failed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotAllowed => "NotAllowed",
            Self::Accepted => "Accepted",
            Self::Adjusted => "Adjusted",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
        }
    }

    /// Whether outcomes of this kind install a new value.
    pub fn installs_value(&self) -> bool {
        matches!(self, Self::Accepted | Self::Adjusted)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::NotAllowed => 0,
            Self::Accepted => 1,
            Self::Adjusted => 2,
            Self::Rejected => 3,
            Self::Failed => 4,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single change attempt against a [`Store`].
///
/// Exactly one variant is active. Each carries a borrow of the originating
/// store and the `original` value observed before the attempt.
///
/// # Example
///
/// ```rust
/// use custodian::core::ChangeResult;
/// use custodian::Store;
///
/// let store = Store::new(1);
/// let outcome = store.change(|x| x + 1).change(|x| x * 10);
///
/// match &outcome {
///     ChangeResult::Accepted { original, new, .. } => {
///         assert_eq!((*original, *new), (2, 20));
///     }
///     other => panic!("unexpected outcome: {other}"),
/// }
/// assert_eq!(store.read(), 20);
/// ```
#[derive(Clone)]
#[must_use = "the outcome reports whether the change was installed"]
pub enum ChangeResult<'s, D> {
    /// The approver vetoed the change before it was attempted.
    NotAllowed {
        store: &'s Store<D>,
        original: D,
        reason: Veto,
    },

    /// The transformed value was installed verbatim.
    Accepted {
        store: &'s Store<D>,
        original: D,
        new: D,
    },

    /// The acceptor installed a modified value instead of the proposal.
    Adjusted {
        store: &'s Store<D>,
        original: D,
        proposed: D,
        adjusted: D,
    },

    /// The acceptor refused the proposal. Nothing was installed.
    Rejected {
        store: &'s Store<D>,
        original: D,
        proposed: D,
        rollback: D,
        reason: Rejection,
    },

    /// No installable value was produced.
    Failed {
        store: &'s Store<D>,
        original: D,
        problem: ChangeError,
    },
}

impl<'s, D> ChangeResult<'s, D> {
    /// Which of the five outcomes this is.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::NotAllowed { .. } => OutcomeKind::NotAllowed,
            Self::Accepted { .. } => OutcomeKind::Accepted,
            Self::Adjusted { .. } => OutcomeKind::Adjusted,
            Self::Rejected { .. } => OutcomeKind::Rejected,
            Self::Failed { .. } => OutcomeKind::Failed,
        }
    }

    /// True for `Accepted` and `Adjusted`, the outcomes that installed a value.
    pub fn has_changed(&self) -> bool {
        self.kind().installs_value()
    }

    /// The store this outcome was produced by.
    pub fn store(&self) -> &'s Store<D> {
        match self {
            Self::NotAllowed { store, .. }
            | Self::Accepted { store, .. }
            | Self::Adjusted { store, .. }
            | Self::Rejected { store, .. }
            | Self::Failed { store, .. } => *store,
        }
    }

    /// The value observed before the attempt.
    pub fn original(&self) -> &D {
        match self {
            Self::NotAllowed { original, .. }
            | Self::Accepted { original, .. }
            | Self::Adjusted { original, .. }
            | Self::Rejected { original, .. }
            | Self::Failed { original, .. } => original,
        }
    }

    /// The value this outcome installed, if any.
    ///
    /// `None` for `NotAllowed`, `Rejected` and `Failed`. Use
    /// [`into_result`](Self::into_result) to tell those apart.
    pub fn result(&self) -> Option<&D> {
        match self {
            Self::Accepted { new, .. } => Some(new),
            Self::Adjusted { adjusted, .. } => Some(adjusted),
            Self::NotAllowed { .. } | Self::Rejected { .. } | Self::Failed { .. } => None,
        }
    }

    /// The installed value, or [`AbsentValue`] naming the outcome kind.
    pub fn value(&self) -> Result<&D, AbsentValue> {
        self.result().ok_or(AbsentValue { kind: self.kind() })
    }

    /// Consume the outcome, keeping the installed value or the reason none was installed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use custodian::core::{ChangeFailure, Veto};
    /// use custodian::Store;
    ///
    /// let store = Store::builder()
    ///     .initial(5)
    ///     .approve_with(|_: &i32| Err(Veto::new("frozen")))
    ///     .build()
    ///     .unwrap();
    ///
    /// let err = store.change(|x| x + 1).into_result().unwrap_err();
    /// assert_eq!(err, ChangeFailure::NotAllowed(Veto::new("frozen")));
    /// ```
    pub fn into_result(self) -> Result<D, ChangeFailure> {
        match self {
            Self::Accepted { new, .. } => Ok(new),
            Self::Adjusted { adjusted, .. } => Ok(adjusted),
            Self::NotAllowed { reason, .. } => Err(ChangeFailure::NotAllowed(reason)),
            Self::Rejected { reason, .. } => Err(ChangeFailure::Rejected(reason)),
            Self::Failed { problem, .. } => Err(ChangeFailure::Failed(problem)),
        }
    }

    /// Run `consumer` against the store's current value, then return this outcome unchanged.
    ///
    /// The consumer sees the store's value at the time of the call, which
    /// may already differ from anything recorded in this outcome.
    pub fn inspect<F>(self, consumer: F) -> Self
    where
        F: FnOnce(&D),
    {
        self.store().inspect(consumer);
        self
    }

    /// Like [`inspect`](Self::inspect), but an error from `consumer` is returned to the caller.
    pub fn try_inspect<F, E>(self, consumer: F) -> Result<Self, E>
    where
        F: FnOnce(&D) -> Result<(), E>,
    {
        self.store().inspect(consumer)?;
        Ok(self)
    }
}

impl<'s, D: Clone> ChangeResult<'s, D> {
    /// Apply `next` through the store if this outcome installed a value.
    ///
    /// Negative outcomes are returned as-is and `next` is never called,
    /// so a chain of changes stops at the first step that did not mutate.
    pub fn change<F>(self, next: F) -> Self
    where
        F: Fn(&D) -> D,
    {
        if self.has_changed() {
            self.store().change(next)
        } else {
            self
        }
    }

    /// Fallible counterpart of [`change`](Self::change).
    pub fn try_change<F, E>(self, next: F) -> Self
    where
        F: Fn(&D) -> Result<D, E>,
        E: Into<BoxError>,
    {
        if self.has_changed() {
            self.store().try_change(next)
        } else {
            self
        }
    }
}

// Outcomes are equal when they come from the same store and carry equal fields.
impl<D: PartialEq> PartialEq for ChangeResult<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        if !ptr::eq(self.store(), other.store()) {
            return false;
        }
        match (self, other) {
            (
                Self::NotAllowed {
                    original: o1,
                    reason: r1,
                    ..
                },
                Self::NotAllowed {
                    original: o2,
                    reason: r2,
                    ..
                },
            ) => o1 == o2 && r1 == r2,
            (
                Self::Accepted {
                    original: o1,
                    new: n1,
                    ..
                },
                Self::Accepted {
                    original: o2,
                    new: n2,
                    ..
                },
            ) => o1 == o2 && n1 == n2,
            (
                Self::Adjusted {
                    original: o1,
                    proposed: p1,
                    adjusted: a1,
                    ..
                },
                Self::Adjusted {
                    original: o2,
                    proposed: p2,
                    adjusted: a2,
                    ..
                },
            ) => o1 == o2 && p1 == p2 && a1 == a2,
            (
                Self::Rejected {
                    original: o1,
                    proposed: p1,
                    rollback: b1,
                    reason: r1,
                    ..
                },
                Self::Rejected {
                    original: o2,
                    proposed: p2,
                    rollback: b2,
                    reason: r2,
                    ..
                },
            ) => o1 == o2 && p1 == p2 && b1 == b2 && r1 == r2,
            (
                Self::Failed {
                    original: o1,
                    problem: e1,
                    ..
                },
                Self::Failed {
                    original: o2,
                    problem: e2,
                    ..
                },
            ) => o1 == o2 && e1 == e2,
            _ => false,
        }
    }
}

// The store is left out: its current value says nothing about this attempt.
impl<D: fmt::Debug> fmt::Debug for ChangeResult<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.kind().name());
        match self {
            Self::NotAllowed {
                original, reason, ..
            } => out.field("original", original).field("reason", reason),
            Self::Accepted { original, new, .. } => {
                out.field("original", original).field("new", new)
            }
            Self::Adjusted {
                original,
                proposed,
                adjusted,
                ..
            } => out
                .field("original", original)
                .field("proposed", proposed)
                .field("adjusted", adjusted),
            Self::Rejected {
                original,
                proposed,
                rollback,
                reason,
                ..
            } => out
                .field("original", original)
                .field("proposed", proposed)
                .field("rollback", rollback)
                .field("reason", reason),
            Self::Failed {
                original, problem, ..
            } => out.field("original", original).field("problem", problem),
        };
        out.finish_non_exhaustive()
    }
}

impl<D: fmt::Debug> fmt::Display for ChangeResult<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed {
                original, reason, ..
            } => write!(f, "NotAllowed(original={original:?}, reason={reason})"),
            Self::Accepted { original, new, .. } => {
                write!(f, "Accepted(original={original:?}, new={new:?})")
            }
            Self::Adjusted {
                original,
                proposed,
                adjusted,
                ..
            } => write!(
                f,
                "Adjusted(original={original:?}, proposed={proposed:?}, adjusted={adjusted:?})"
            ),
            Self::Rejected {
                original,
                proposed,
                rollback,
                reason,
                ..
            } => write!(
                f,
                "Rejected(original={original:?}, proposed={proposed:?}, rollback={rollback:?}, reason={reason})"
            ),
            Self::Failed {
                original, problem, ..
            } => write!(f, "Failed(original={original:?}, problem={problem})"),
        }
    }
}
