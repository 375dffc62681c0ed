//! Builder for constructing stores.

use crate::approval::ApprovalRules;
use crate::builder::error::BuildError;
use crate::core::{Acceptor, Approver, ChangeError, Veto, Verdict};
use crate::store::{RetryPolicy, Store};

/// Builder for constructing stores with a fluent API.
///
/// Hooks left unset fall back to a permissive approver and a verbatim
/// acceptor.
///
/// # Example
///
/// ```rust
/// use custodian::core::Verdict;
/// use custodian::store::RetryPolicy;
/// use custodian::Store;
///
/// let store = Store::builder()
///     .initial(10)
///     .approve_when(|v: &i32| *v < 100, "limit reached")
///     .accept_proposal(|_, proposed: &i32| {
///         if *proposed < 0 { Verdict::Adjust(0) } else { Verdict::Accept }
///     })
///     .retry(RetryPolicy::default().max_attempts(16))
///     .build()
///     .unwrap();
///
/// assert_eq!(store.change(|_| -3).value(), Ok(&0));
/// ```
pub struct StoreBuilder<D> {
    initial: Option<D>,
    approver: Option<Approver<D>>,
    acceptor: Option<Acceptor<D>>,
    retry: RetryPolicy,
}

impl<D> StoreBuilder<D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            approver: None,
            acceptor: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the initial value (required).
    pub fn initial(mut self, value: D) -> Self {
        self.initial = Some(value);
        self
    }

    /// Set the approver (optional).
    pub fn approver(mut self, approver: Approver<D>) -> Self {
        self.approver = Some(approver);
        self
    }

    /// Set the approver using a closure (optional).
    pub fn approve_with<F>(self, check: F) -> Self
    where
        F: Fn(&D) -> Result<(), Veto> + Send + Sync + 'static,
    {
        self.approver(Approver::new(check))
    }

    /// Veto with `reason` whenever `predicate` is false (optional).
    pub fn approve_when<F>(self, predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.approver(Approver::when(predicate, reason))
    }

    /// Use approval rules as the approver (optional).
    pub fn rules(self, rules: ApprovalRules<D>) -> Self
    where
        D: 'static,
    {
        self.approver(rules.into_approver())
    }

    /// Set the acceptor (optional).
    pub fn acceptor(mut self, acceptor: Acceptor<D>) -> Self {
        self.acceptor = Some(acceptor);
        self
    }

    /// Set the acceptor using a closure over the raw transformation result (optional).
    pub fn accept_with<F>(self, decide: F) -> Self
    where
        F: Fn(&D, &Result<D, ChangeError>) -> Verdict<D> + Send + Sync + 'static,
    {
        self.acceptor(Acceptor::new(decide))
    }

    /// Set the acceptor using a closure over produced values only (optional).
    pub fn accept_proposal<F>(self, decide: F) -> Self
    where
        F: Fn(&D, &D) -> Verdict<D> + Send + Sync + 'static,
    {
        self.acceptor(Acceptor::on_proposal(decide))
    }

    /// Set the contention policy (optional).
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Build the store.
    /// Returns an error if required fields are missing or the policy is unusable.
    pub fn build(self) -> Result<Store<D>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialValue)?;

        if self.retry.attempt_limit() == Some(0) {
            return Err(BuildError::ZeroAttempts);
        }

        Ok(Store::from_parts(
            initial,
            self.approver.unwrap_or_default(),
            self.acceptor.unwrap_or_default(),
            self.retry,
        ))
    }
}

impl<D> Default for StoreBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChangeResult, OutcomeKind, Rejection};

    #[test]
    fn builder_validates_required_fields() {
        let result = StoreBuilder::<i32>::new().build();

        assert!(matches!(result, Err(BuildError::MissingInitialValue)));
    }

    #[test]
    fn builder_rejects_zero_attempts() {
        let result = StoreBuilder::new()
            .initial(0)
            .retry(RetryPolicy::default().max_attempts(0))
            .build();

        assert!(matches!(result, Err(BuildError::ZeroAttempts)));
    }

    #[test]
    fn defaults_are_permissive_and_verbatim() {
        let store = StoreBuilder::new().initial(1).build().unwrap();

        let outcome = store.change(|x| x + 1);

        assert_eq!(outcome.kind(), OutcomeKind::Accepted);
        assert_eq!(store.retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn approve_when_vetoes() {
        let store = StoreBuilder::new()
            .initial(5)
            .approve_when(|v: &i32| *v < 5, "frozen")
            .build()
            .unwrap();

        let outcome = store.change(|x| x + 1);

        assert_eq!(outcome.kind(), OutcomeKind::NotAllowed);
        assert_eq!(store.read(), 5);
    }

    #[test]
    fn accept_with_sees_transformation_errors() {
        let store = StoreBuilder::new()
            .initial(2)
            .accept_with(|original: &i32, proposed| match proposed {
                Ok(v) => Verdict::reject(original - 1, format!("refusing {v}")),
                Err(e) => Verdict::Fail(e.clone()),
            })
            .build()
            .unwrap();

        match store.change(|x| x * 2) {
            ChangeResult::Rejected {
                proposed,
                rollback,
                reason,
                ..
            } => {
                assert_eq!(proposed, 4);
                assert_eq!(rollback, 1);
                assert_eq!(reason, Rejection::new("refusing 4"));
            }
            other => panic!("Expected Rejected, got {other}"),
        }
    }

    #[test]
    fn fluent_api_builds_store() {
        let store = StoreBuilder::new()
            .initial(String::from("draft"))
            .approver(Approver::permissive())
            .acceptor(Acceptor::verbatim())
            .retry(RetryPolicy::unbounded())
            .build();

        assert!(store.is_ok());
        let store = store.unwrap();
        assert_eq!(store.read(), "draft");
        assert_eq!(store.retry_policy().attempt_limit(), None);
    }
}
