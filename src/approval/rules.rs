//! Approval rules evaluated with Validation.

use crate::core::{Approver, Veto};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for approval check functions
pub type ApprovalCheck<D> =
    Box<dyn Fn(&D) -> Validation<(), NonEmptyVec<String>> + Send + Sync>;

/// A set of requirements the current value must meet before a change may run.
/// Uses Validation to accumulate ALL failed requirements.
pub struct ApprovalRules<D> {
    checks: Vec<ApprovalCheck<D>>,
}

impl<D> ApprovalRules<D> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&D) -> Validation<(), NonEmptyVec<String>> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with a veto reason
    pub fn require_pred<F>(mut self, predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        let reason = reason.into();
        let check = move |value: &D| -> Validation<(), NonEmptyVec<String>> {
            if predicate(value) {
                Validation::success(())
            } else {
                Validation::fail(reason.clone())
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Evaluate all rules, accumulating ALL failures.
    /// Returns Validation::Success(()) if every rule passes.
    pub fn evaluate(&self, value: &D) -> Validation<(), NonEmptyVec<String>> {
        if self.checks.is_empty() {
            return Validation::success(());
        }

        let checks: Vec<Validation<(), NonEmptyVec<String>>> =
            self.checks.iter().map(|check| check(value)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Evaluate all rules and turn any failures into one veto.
    pub fn check(&self, value: &D) -> Result<(), Veto> {
        match self.evaluate(value) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(reasons) => {
                Err(Veto::from_reasons(reasons.iter().cloned().collect()))
            }
        }
    }

    pub fn into_approver(self) -> Approver<D>
    where
        D: 'static,
    {
        Approver::new(move |value| self.check(value))
    }
}

impl<D> Default for ApprovalRules<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: 'static> From<ApprovalRules<D>> for Approver<D> {
    fn from(rules: ApprovalRules<D>) -> Self {
        rules.into_approver()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Account {
        balance: i64,
        frozen: bool,
    }

    fn account_rules() -> ApprovalRules<Account> {
        ApprovalRules::new()
            .require_pred(|a: &Account| !a.frozen, "account is frozen")
            .require_pred(|a: &Account| a.balance >= 0, "account is overdrawn")
    }

    #[test]
    fn rules_accumulate_all_failures() {
        let rules = account_rules().require_pred(|_| false, "always fails");
        let account = Account {
            balance: -10,
            frozen: true,
        };

        match rules.evaluate(&account) {
            Validation::Failure(reasons) => {
                assert_eq!(reasons.len(), 3);
                assert!(reasons.iter().any(|r| r == "account is frozen"));
                assert!(reasons.iter().any(|r| r == "account is overdrawn"));
                assert!(reasons.iter().any(|r| r == "always fails"));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn rules_succeed_when_all_pass() {
        let account = Account {
            balance: 10,
            frozen: false,
        };

        assert!(account_rules().evaluate(&account).is_success());
        assert_eq!(account_rules().check(&account), Ok(()));
    }

    #[test]
    fn empty_rules_approve_everything() {
        let rules: ApprovalRules<i32> = ApprovalRules::new();

        assert!(rules.is_empty());
        assert!(rules.evaluate(&0).is_success());
    }

    #[test]
    fn custom_validation_check_works() {
        let rules = ApprovalRules::new().require(|v: &i32| {
            if *v > 0 {
                Validation::success(())
            } else {
                Validation::fail("must be positive".to_string())
            }
        });

        assert_eq!(rules.len(), 1);
        assert!(rules.evaluate(&0).is_failure());
        assert!(rules.evaluate(&1).is_success());
    }

    #[test]
    fn check_collects_reasons_into_veto() {
        let account = Account {
            balance: -1,
            frozen: true,
        };

        let veto = account_rules().check(&account).unwrap_err();

        assert_eq!(veto.reasons(), ["account is frozen", "account is overdrawn"]);
        assert_eq!(veto.to_string(), "account is frozen; account is overdrawn");
    }

    #[test]
    fn approver_from_rules_vetoes_store_changes() {
        let approver: Approver<Account> = account_rules().into();
        let frozen = Account {
            balance: 5,
            frozen: true,
        };

        assert_eq!(approver.check(&frozen), Err(Veto::new("account is frozen")));
    }
}
