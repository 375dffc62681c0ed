//! Core change types and hooks.
//!
//! This module contains the pure parts of a governed change:
//! - The closed set of outcomes via [`ChangeResult`]
//! - Approver and acceptor hooks that decide each attempt
//! - Reason and error payloads carried by outcomes
//! - Table-driven outcome matching
//!
//! Nothing here touches shared state. The store in [`crate::store`]
//! applies these decisions atomically.

mod hooks;
mod matcher;
mod outcome;
mod reason;

pub use hooks::{Acceptor, Approver, Verdict};
pub use matcher::OutcomeMatcher;
pub(crate) use matcher::Handler;
pub use outcome::{ChangeResult, OutcomeKind};
pub use reason::{AbsentValue, BoxError, ChangeError, ChangeFailure, Rejection, Veto};
