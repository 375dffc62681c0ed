//! The imperative shell: the shared cell and its contention policy.
//!
//! Everything that touches shared state lives here. Decisions about a
//! change (approve, accept, adjust, reject) are delegated to the pure hooks
//! in [`crate::core`]; this module only runs them against a snapshot and
//! publishes the result with compare-and-swap.

mod cell;
mod retry;

pub use cell::Store;
pub use retry::{Pause, RetryPolicy};
