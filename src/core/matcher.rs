//! Table-driven dispatch over change outcomes.
//!
//! `match` on [`ChangeResult`] is already exhaustive. `OutcomeMatcher`
//! covers the case where handlers are assembled at runtime: it can only be
//! built once every [`OutcomeKind`] has a handler or a fallback is given.

use super::outcome::{ChangeResult, OutcomeKind};
use std::sync::Arc;

pub(crate) type Handler<'h, D, R> = Arc<dyn Fn(&ChangeResult<'_, D>) -> R + 'h>;

/// A complete set of outcome handlers.
///
/// Built with [`OutcomeMatcherBuilder`](crate::builder::OutcomeMatcherBuilder).
///
/// # Example
///
/// ```rust
/// use custodian::core::{OutcomeKind, OutcomeMatcher};
/// use custodian::Store;
///
/// let describe = OutcomeMatcher::builder()
///     .on_accepted(|outcome| format!("now {}", outcome.result().unwrap()))
///     .otherwise(|outcome| format!("unchanged ({})", outcome.kind()))
///     .build()
///     .unwrap();
///
/// let store = Store::new(1);
/// assert_eq!(describe.apply(&store.change(|x| x + 1)), "now 2");
/// ```
pub struct OutcomeMatcher<'h, D, R> {
    handlers: Vec<Handler<'h, D, R>>,
}

impl<'h, D, R> OutcomeMatcher<'h, D, R> {
    /// `handlers` holds one entry per kind, indexed by `OutcomeKind::index`.
    pub(crate) fn from_table(handlers: Vec<Handler<'h, D, R>>) -> Self {
        debug_assert_eq!(handlers.len(), OutcomeKind::ALL.len());
        Self { handlers }
    }

    /// Run the handler registered for this outcome's kind.
    pub fn apply(&self, outcome: &ChangeResult<'_, D>) -> R {
        (self.handlers[outcome.kind().index()])(outcome)
    }
}
