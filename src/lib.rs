//! Custodian: a governed atomic value cell
//!
//! A [`Store`] holds one value that many threads may read and change
//! concurrently. Every change passes through two pluggable hooks: an
//! approver that may veto the change before it runs, and an acceptor that
//! decides what to install once the transformation has produced a value.
//! The result of each attempt is one of five [`ChangeResult`] outcomes,
//! returned as data rather than raised as an error.
//!
//! # Core Concepts
//!
//! - **Store**: lock-free cell updated with compare-and-swap and bounded retries
//! - **Approver**: pure pre-change veto
//! - **Acceptor**: pure post-change decision (accept, adjust, reject, fail)
//! - **ChangeResult**: closed outcome with chaining helpers
//!
//! # Example
//!
//! ```rust
//! use custodian::core::{ChangeResult, Verdict};
//! use custodian::Store;
//!
//! let store = Store::builder()
//!     .initial(10)
//!     .accept_proposal(|_, proposed: &i32| {
//!         if *proposed < 0 { Verdict::Adjust(0) } else { Verdict::Accept }
//!     })
//!     .build()
//!     .unwrap();
//!
//! match store.change(|_| -3) {
//!     ChangeResult::Adjusted { original, proposed, adjusted, .. } => {
//!         assert_eq!((original, proposed, adjusted), (10, -3, 0));
//!     }
//!     other => panic!("unexpected outcome: {other}"),
//! }
//! assert_eq!(store.read(), 0);
//! ```

pub mod approval;
pub mod builder;
pub mod core;
pub mod store;

// Re-export commonly used types
pub use builder::{BuildError, StoreBuilder};
pub use core::{Acceptor, Approver, ChangeResult, OutcomeKind, Verdict, Veto};
pub use store::{RetryPolicy, Store};
