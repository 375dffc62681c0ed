//! Property-based tests for store changes and outcomes.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use custodian::approval::ApprovalRules;
use custodian::core::{ChangeError, ChangeResult, OutcomeKind, Rejection, Veto};
use custodian::store::{Pause, RetryPolicy};
use custodian::{Acceptor, Approver, Store, Verdict};
use proptest::prelude::*;
use std::cell::Cell;
use std::ptr;

#[derive(Clone, Copy, Debug)]
enum Op {
    Add(i64),
    Mul(i64),
    Set(i64),
}

impl Op {
    fn apply(self, x: i64) -> i64 {
        match self {
            Op::Add(n) => x.wrapping_add(n),
            Op::Mul(n) => x.wrapping_mul(n),
            Op::Set(n) => n,
        }
    }
}

prop_compose! {
    fn arbitrary_op()(variant in 0..3u8, n in -1000i64..1000) -> Op {
        match variant {
            0 => Op::Add(n),
            1 => Op::Mul(n),
            _ => Op::Set(n),
        }
    }
}

/// A store whose hooks produce the given outcome kind for any change.
fn store_producing(kind: OutcomeKind, initial: i64) -> Store<i64> {
    match kind {
        OutcomeKind::NotAllowed => Store::with_hooks(
            initial,
            Approver::new(|_| Err(Veto::new("closed"))),
            Acceptor::verbatim(),
        ),
        OutcomeKind::Accepted => Store::new(initial),
        OutcomeKind::Adjusted => Store::with_hooks(
            initial,
            Approver::permissive(),
            Acceptor::on_proposal(|_, p: &i64| Verdict::Adjust(p.wrapping_add(1))),
        ),
        OutcomeKind::Rejected => Store::with_hooks(
            initial,
            Approver::permissive(),
            Acceptor::on_proposal(|o: &i64, _| Verdict::reject(o.wrapping_sub(1), "refused")),
        ),
        OutcomeKind::Failed => Store::with_hooks(
            initial,
            Approver::permissive(),
            Acceptor::on_proposal(|_, _| Verdict::Fail(ChangeError::transform("broken"))),
        ),
    }
}

prop_compose! {
    fn arbitrary_kind()(variant in 0..5usize) -> OutcomeKind {
        OutcomeKind::ALL[variant]
    }
}

proptest! {
    #[test]
    fn permissive_change_is_accepted(initial in any::<i64>(), op in arbitrary_op()) {
        let store = Store::new(initial);
        let expected = op.apply(initial);

        let outcome = store.change(|x| op.apply(*x));

        prop_assert_eq!(
            outcome,
            ChangeResult::Accepted { store: &store, original: initial, new: expected }
        );
        prop_assert_eq!(store.read(), expected);
    }

    #[test]
    fn has_changed_iff_value_installed(kind in arbitrary_kind(), initial in -1000i64..1000) {
        let store = store_producing(kind, initial);

        let outcome = store.change(|x| x + 10);

        prop_assert_eq!(outcome.kind(), kind);
        prop_assert_eq!(
            outcome.has_changed(),
            matches!(kind, OutcomeKind::Accepted | OutcomeKind::Adjusted)
        );
        prop_assert_eq!(outcome.result().is_some(), outcome.has_changed());
        prop_assert_eq!(outcome.value().is_ok(), outcome.has_changed());
        if outcome.has_changed() {
            prop_assert_eq!(outcome.result().copied(), Some(store.read()));
        } else {
            prop_assert_eq!(store.read(), initial);
        }
    }

    #[test]
    fn store_is_identical_for_every_outcome(kind in arbitrary_kind(), initial in any::<i64>()) {
        let store = store_producing(kind, initial);

        let outcome = store.change(|x| x.wrapping_mul(3));

        prop_assert!(ptr::eq(outcome.store(), &store));
        prop_assert_eq!(*outcome.original(), initial);
    }

    #[test]
    fn chained_change_skips_negative_outcomes(
        kind in prop::sample::select(vec![
            OutcomeKind::NotAllowed,
            OutcomeKind::Rejected,
            OutcomeKind::Failed,
        ]),
        initial in -1000i64..1000
    ) {
        let store = store_producing(kind, initial);
        let outcome = store.change(|x| x + 1);
        let expected = outcome.clone();
        let calls = Cell::new(0);

        let chained = outcome.change(|x| {
            calls.set(calls.get() + 1);
            x + 1
        });

        prop_assert_eq!(calls.get(), 0);
        prop_assert_eq!(chained, expected);
        prop_assert_eq!(store.read(), initial);
    }

    #[test]
    fn inspect_runs_once_and_returns_outcome(kind in arbitrary_kind(), initial in -1000i64..1000) {
        let store = store_producing(kind, initial);
        let outcome = store.change(|x| x - 7);
        let expected = outcome.clone();
        let current = store.read();
        let seen = Cell::new(Vec::new());

        let returned = outcome.inspect(|v| {
            let mut values = seen.take();
            values.push(*v);
            seen.set(values);
        });

        prop_assert_eq!(seen.take(), vec![current]);
        prop_assert_eq!(returned, expected);
    }

    #[test]
    fn chained_changes_compose(initial in -1000i64..1000, ops in prop::collection::vec(arbitrary_op(), 1..10)) {
        let store = Store::new(initial);
        let mut outcome = store.change(|x| *x);
        let mut expected = initial;

        for op in &ops {
            outcome = outcome.change(|x| op.apply(*x));
            expected = op.apply(expected);
        }

        prop_assert_eq!(outcome.kind(), OutcomeKind::Accepted);
        prop_assert_eq!(store.read(), expected);
    }

    #[test]
    fn rejection_never_installs(initial in any::<i64>(), proposed in any::<i64>()) {
        let store = store_producing(OutcomeKind::Rejected, initial);

        let outcome = store.change(|_| proposed);

        prop_assert_eq!(
            outcome,
            ChangeResult::Rejected {
                store: &store,
                original: initial,
                proposed,
                rollback: initial.wrapping_sub(1),
                reason: Rejection::new("refused"),
            }
        );
        prop_assert_eq!(store.read(), initial);
    }

    #[test]
    fn approval_rules_report_every_failure(value in -100i64..100) {
        let rules = ApprovalRules::new()
            .require_pred(|v: &i64| *v >= 0, "negative")
            .require_pred(|v: &i64| *v % 2 == 0, "odd");

        let expected: Vec<&str> = [(value < 0, "negative"), (value % 2 != 0, "odd")]
            .into_iter()
            .filter_map(|(failed, reason)| failed.then_some(reason))
            .collect();

        match rules.check(&value) {
            Ok(()) => {
                prop_assert!(expected.is_empty());
            }
            Err(veto) => {
                prop_assert_eq!(veto.reasons(), expected.as_slice());
            }
        }
    }

    #[test]
    fn pause_is_deterministic(failed in 1usize..100) {
        let policy = RetryPolicy::default();

        prop_assert_eq!(policy.pause_after(failed), policy.pause_after(failed));
    }

    #[test]
    fn sleeps_never_exceed_max_backoff(failed in 1usize..10_000) {
        let policy = RetryPolicy::default();

        if let Pause::Sleep(delay) = policy.pause_after(failed) {
            prop_assert!(delay <= std::time::Duration::from_millis(10));
        }
    }
}
