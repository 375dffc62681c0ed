//! Build errors for store and matcher builders.

use crate::core::OutcomeKind;
use thiserror::Error;

/// Errors that can occur when building stores and outcome matchers.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial value not specified. Call .initial(value) before .build()")]
    MissingInitialValue,

    #[error("Retry policy allows zero attempts. Use .max_attempts(n) with n >= 1")]
    ZeroAttempts,

    #[error("Outcome matcher leaves {kinds:?} unhandled. Add handlers or call .otherwise(handler)")]
    UnhandledOutcomes { kinds: Vec<OutcomeKind> },
}
