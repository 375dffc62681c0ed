//! Hooks that govern every change attempt.
//!
//! An [`Approver`] is consulted before the transformation runs and may veto
//! it. An [`Acceptor`] is consulted afterwards and decides what, if
//! anything, gets installed. Both are pure decision functions: the store
//! may call them several times for one `change` when it loses a race.

use super::reason::{ChangeError, Rejection, Veto};

/// The acceptor's decision about a transformation result.
///
/// There is deliberately no way to veto here: vetoes belong to the
/// approver and happen before the transformation runs.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict<D> {
    /// Install the proposed value as-is.
    Accept,

    /// Install this value instead of the proposal.
    Adjust(D),

    /// Install nothing. `rollback` is recorded in the outcome.
    Reject { rollback: D, reason: Rejection },

    /// Install nothing and report a failure.
    Fail(ChangeError),
}

impl<D> Verdict<D> {
    /// Reject with a reason message.
    pub fn reject(rollback: D, reason: impl Into<String>) -> Self {
        Self::Reject {
            rollback,
            reason: Rejection::new(reason),
        }
    }
}

/// Pre-change veto hook.
///
/// # Example
///
/// ```rust
/// use custodian::core::{Approver, Veto};
///
/// let not_negative = Approver::new(|v: &i32| {
///     if *v >= 0 {
///         Ok(())
///     } else {
///         Err(Veto::new("value is negative"))
///     }
/// });
///
/// assert!(not_negative.check(&3).is_ok());
/// assert_eq!(not_negative.check(&-1), Err(Veto::new("value is negative")));
/// ```
pub struct Approver<D> {
    check: Box<dyn Fn(&D) -> Result<(), Veto> + Send + Sync>,
}

impl<D> Approver<D> {
    /// Create an approver from a pure check on the current value.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&D) -> Result<(), Veto> + Send + Sync + 'static,
    {
        Approver {
            check: Box::new(check),
        }
    }

    /// An approver that never objects.
    pub fn permissive() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Veto with `reason` whenever `predicate` is false.
    pub fn when<F>(predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        let reason = reason.into();
        Self::new(move |value| {
            if predicate(value) {
                Ok(())
            } else {
                Err(Veto::new(reason.clone()))
            }
        })
    }

    pub fn check(&self, current: &D) -> Result<(), Veto> {
        (self.check)(current)
    }
}

impl<D> Default for Approver<D> {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Post-change decision hook.
///
/// Receives the original value and the transformation's result. When the
/// transformation failed, only [`Verdict::Fail`] is meaningful: any other
/// verdict is reported as `Failed` with the transformation's own error,
/// since there is no proposal to accept, adjust or reject.
///
/// # Example
///
/// ```rust
/// use custodian::core::{Acceptor, ChangeError, Verdict};
///
/// let clamp = Acceptor::new(|_: &i32, proposed: &Result<i32, ChangeError>| match proposed {
///     Ok(v) if *v < 0 => Verdict::Adjust(0),
///     Ok(_) => Verdict::Accept,
///     Err(e) => Verdict::Fail(e.clone()),
/// });
///
/// assert_eq!(clamp.decide(&10, &Ok(-3)), Verdict::Adjust(0));
/// assert_eq!(clamp.decide(&10, &Ok(4)), Verdict::Accept);
/// ```
pub struct Acceptor<D> {
    decide: Box<dyn Fn(&D, &Result<D, ChangeError>) -> Verdict<D> + Send + Sync>,
}

impl<D> Acceptor<D> {
    /// Create an acceptor from a pure decision over the original value and the transformation's result.
    pub fn new<F>(decide: F) -> Self
    where
        F: Fn(&D, &Result<D, ChangeError>) -> Verdict<D> + Send + Sync + 'static,
    {
        Acceptor {
            decide: Box::new(decide),
        }
    }

    /// Accept every produced value verbatim and fail on every error.
    pub fn verbatim() -> Self {
        Self::new(|_, proposed| match proposed {
            Ok(_) => Verdict::Accept,
            Err(problem) => Verdict::Fail(problem.clone()),
        })
    }

    /// Decide only over successfully produced values; errors always fail.
    pub fn on_proposal<F>(decide: F) -> Self
    where
        F: Fn(&D, &D) -> Verdict<D> + Send + Sync + 'static,
    {
        Self::new(move |original, proposed| match proposed {
            Ok(value) => decide(original, value),
            Err(problem) => Verdict::Fail(problem.clone()),
        })
    }

    pub fn decide(&self, original: &D, proposed: &Result<D, ChangeError>) -> Verdict<D> {
        (self.decide)(original, proposed)
    }
}

impl<D> Default for Acceptor<D> {
    fn default() -> Self {
        Self::verbatim()
    }
}
