//! The governed value cell.

use super::retry::RetryPolicy;
use crate::builder::StoreBuilder;
use crate::core::{Acceptor, Approver, BoxError, ChangeError, ChangeResult, Verdict};
use arc_swap::ArcSwap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// An atomically updated value whose changes pass through an approver and an acceptor.
///
/// Reads never block. Writes run an optimistic compare-and-swap loop: if
/// another writer installs a value between reading and swapping, the whole
/// approve/transform/accept cycle runs again against the newer value, as
/// governed by the store's [`RetryPolicy`].
///
/// # Example
///
/// ```rust
/// use custodian::core::ChangeResult;
/// use custodian::Store;
///
/// let store = Store::new(0);
/// let outcome = store.change(|x| x + 1);
///
/// assert!(matches!(outcome, ChangeResult::Accepted { original: 0, new: 1, .. }));
/// assert_eq!(store.read(), 1);
/// ```
pub struct Store<D> {
    current: ArcSwap<D>,
    approver: Approver<D>,
    acceptor: Acceptor<D>,
    retry: RetryPolicy,
}

/// What to do with a decided attempt.
enum Decision<'s, D> {
    /// Return without touching the stored value.
    Settle(ChangeResult<'s, D>),
    /// Swap in the value, then return the outcome.
    Install(D, ChangeResult<'s, D>),
}

impl<D> Store<D> {
    /// Create a store with a permissive approver and a verbatim acceptor.
    pub fn new(initial: D) -> Self {
        Self::with_hooks(initial, Approver::permissive(), Acceptor::verbatim())
    }

    /// Create a store governed by the given hooks and the default retry policy.
    pub fn with_hooks(initial: D, approver: Approver<D>, acceptor: Acceptor<D>) -> Self {
        Self::from_parts(initial, approver, acceptor, RetryPolicy::default())
    }

    /// Start a [`StoreBuilder`] for a store with custom hooks or retries.
    pub fn builder() -> StoreBuilder<D> {
        StoreBuilder::new()
    }

    pub(crate) fn from_parts(
        initial: D,
        approver: Approver<D>,
        acceptor: Acceptor<D>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            current: ArcSwap::new(Arc::new(initial)),
            approver,
            acceptor,
            retry,
        }
    }

    /// Shared snapshot of the current value. Never blocks.
    pub fn snapshot(&self) -> Arc<D> {
        self.current.load_full()
    }

    /// Pass the current value to `consumer` and return what it returns.
    ///
    /// Not part of the update protocol: nothing is approved or installed,
    /// and an `Err` from the consumer reaches the caller untouched.
    pub fn inspect<F, R>(&self, consumer: F) -> R
    where
        F: FnOnce(&D) -> R,
    {
        let current = self.current.load_full();
        consumer(&current)
    }

    /// The policy applied when a compare-and-swap loses a race.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}

impl<D: Clone> Store<D> {
    /// Copy of the current value. Never blocks.
    pub fn read(&self) -> D {
        D::clone(&self.current.load())
    }

    /// Run an infallible transformation through the update protocol.
    ///
    /// `changer` may run more than once when other writers race this one,
    /// so it must not have side effects.
    pub fn change<F>(&self, changer: F) -> ChangeResult<'_, D>
    where
        F: Fn(&D) -> D,
    {
        self.try_change(|value| Ok::<D, Infallible>(changer(value)))
    }

    /// Run a fallible transformation through the update protocol.
    ///
    /// An error from `changer` is handed to the acceptor and, unless the
    /// acceptor decides otherwise, reported as [`ChangeResult::Failed`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use custodian::core::OutcomeKind;
    /// use custodian::Store;
    ///
    /// let store = Store::new(10u32);
    /// let outcome = store.try_change(|x| x.checked_sub(20).ok_or("underflow"));
    ///
    /// assert_eq!(outcome.kind(), OutcomeKind::Failed);
    /// assert_eq!(store.read(), 10);
    /// ```
    pub fn try_change<F, E>(&self, changer: F) -> ChangeResult<'_, D>
    where
        F: Fn(&D) -> Result<D, E>,
        E: Into<BoxError>,
    {
        let mut backoff = self.retry.backoff();
        loop {
            let current = self.current.load_full();
            trace!(attempt = backoff.attempt(), "change attempt");

            let (next, outcome) = match self.decide(&current, &changer) {
                Decision::Settle(outcome) => {
                    trace!(outcome = %outcome.kind(), "change settled without install");
                    return outcome;
                }
                Decision::Install(next, outcome) => (next, outcome),
            };

            let previous = self.current.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&previous, &current) {
                trace!(outcome = %outcome.kind(), attempt = backoff.attempt(), "change installed");
                return outcome;
            }

            debug!(attempt = backoff.attempt(), "lost compare-and-swap race, retrying");
            if !backoff.snooze() {
                let attempts = backoff.failed();
                warn!(attempts, "change abandoned after exhausting retry budget");
                return ChangeResult::Failed {
                    store: self,
                    original: D::clone(&current),
                    problem: ChangeError::Contention { attempts },
                };
            }
        }
    }

    /// Approve, transform and accept against one snapshot.
    fn decide<F, E>(&self, current: &D, changer: &F) -> Decision<'_, D>
    where
        F: Fn(&D) -> Result<D, E>,
        E: Into<BoxError>,
    {
        let original = current.clone();
        if let Err(reason) = self.approver.check(current) {
            debug!(%reason, "change vetoed by approver");
            return Decision::Settle(ChangeResult::NotAllowed {
                store: self,
                original,
                reason,
            });
        }

        let proposed = changer(current).map_err(ChangeError::transform);
        let verdict = self.acceptor.decide(current, &proposed);

        match (verdict, proposed) {
            (Verdict::Fail(problem), _) | (_, Err(problem)) => {
                debug!(%problem, "change failed");
                Decision::Settle(ChangeResult::Failed {
                    store: self,
                    original,
                    problem,
                })
            }
            (Verdict::Accept, Ok(new)) => Decision::Install(
                new.clone(),
                ChangeResult::Accepted {
                    store: self,
                    original,
                    new,
                },
            ),
            (Verdict::Adjust(adjusted), Ok(proposed)) => Decision::Install(
                adjusted.clone(),
                ChangeResult::Adjusted {
                    store: self,
                    original,
                    proposed,
                    adjusted,
                },
            ),
            (Verdict::Reject { rollback, reason }, Ok(proposed)) => {
                debug!(%reason, "change rejected by acceptor");
                Decision::Settle(ChangeResult::Rejected {
                    store: self,
                    original,
                    proposed,
                    rollback,
                    reason,
                })
            }
        }
    }
}

impl<D: Default> Default for Store<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: fmt::Debug> fmt::Debug for Store<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.load_full();
        f.debug_struct("Store")
            .field("current", &current)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
