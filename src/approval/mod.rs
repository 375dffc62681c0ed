//! Validation-based approval rules.
//!
//! An approver assembled from several requirements should report every
//! requirement the current value fails, not just the first one. Rules are
//! evaluated with Stillwater's `Validation`, which accumulates all failures,
//! and the collected reasons become a single [`Veto`](crate::core::Veto).
//!
//! # Example
//!
//! ```rust
//! use custodian::approval::ApprovalRules;
//! use custodian::core::ChangeFailure;
//! use custodian::Store;
//!
//! let rules = ApprovalRules::new()
//!     .require_pred(|v: &i32| *v >= 0, "must not be negative")
//!     .require_pred(|v: &i32| *v % 2 == 0, "must be even");
//!
//! let store = Store::builder().initial(-3).rules(rules).build().unwrap();
//!
//! match store.change(|x| x + 1).into_result() {
//!     Err(ChangeFailure::NotAllowed(veto)) => {
//!         assert_eq!(veto.reasons(), ["must not be negative", "must be even"]);
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod rules;

pub use rules::{ApprovalCheck, ApprovalRules};
