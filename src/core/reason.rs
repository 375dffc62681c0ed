//! Reason and error payloads attached to change outcomes.
//!
//! Vetoes, rejections and transformation failures are all expected
//! outcomes of a change attempt. They are carried as data inside a
//! `ChangeResult` rather than raised across the `change` boundary.

use super::outcome::OutcomeKind;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error accepted from fallible transformations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Why an approver refused to let a change begin.
///
/// A veto holds at least one reason. Approvers built from
/// [`ApprovalRules`](crate::approval::ApprovalRules) report every failing
/// rule at once.
///
/// # Example
///
/// ```rust
/// use custodian::core::Veto;
///
/// let veto = Veto::new("frozen");
/// assert_eq!(veto.to_string(), "frozen");
/// assert_eq!(veto.reasons(), ["frozen"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", .reasons.join("; "))]
pub struct Veto {
    reasons: Vec<String>,
}

impl Veto {
    /// Create a veto with a single reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reasons: vec![reason.into()],
        }
    }

    /// Create a veto from several reasons.
    ///
    /// Callers guarantee `reasons` is non-empty.
    pub(crate) fn from_reasons(reasons: Vec<String>) -> Self {
        Self { reasons }
    }

    /// All reasons recorded for this veto, in evaluation order.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Why an acceptor refused a proposed value.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{reason}")]
pub struct Rejection {
    reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A change attempt that could not produce an installable value.
///
/// Cloneable so that the same failure can be handed to the acceptor and
/// still be reported in the outcome. Two errors compare equal only when
/// they wrap the same underlying error instance.
#[derive(Clone, Debug, Error)]
pub enum ChangeError {
    /// The transformation (or the acceptor) reported an error.
    #[error("transformation failed: {0}")]
    Transform(#[source] Arc<dyn StdError + Send + Sync + 'static>),

    /// Every attempt lost the compare-and-swap race and the retry budget ran out.
    #[error("change abandoned after {attempts} contended attempts")]
    Contention { attempts: usize },
}

impl ChangeError {
    /// Wrap any error (or message) as a transformation failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use custodian::core::ChangeError;
    ///
    /// let err = ChangeError::transform("division by zero");
    /// assert_eq!(err.to_string(), "transformation failed: division by zero");
    /// assert!(!err.is_contention());
    /// ```
    pub fn transform(error: impl Into<BoxError>) -> Self {
        Self::Transform(Arc::from(error.into()))
    }

    /// Whether this failure came from exhausting the retry budget.
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::Contention { .. })
    }
}

impl PartialEq for ChangeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transform(a), Self::Transform(b)) => Arc::ptr_eq(a, b),
            (Self::Contention { attempts: a }, Self::Contention { attempts: b }) => a == b,
            _ => false,
        }
    }
}

/// Returned by [`ChangeResult::value`](crate::core::ChangeResult::value)
/// when the outcome did not install a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no value present: change outcome was {kind}")]
pub struct AbsentValue {
    pub kind: OutcomeKind,
}

/// The negative outcomes of a change, with their payloads preserved.
///
/// Returned by [`ChangeResult::into_result`](crate::core::ChangeResult::into_result).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ChangeFailure {
    #[error("change not allowed: {0}")]
    NotAllowed(Veto),

    #[error("change rejected: {0}")]
    Rejected(Rejection),

    #[error(transparent)]
    Failed(ChangeError),
}

impl ChangeFailure {
    /// The outcome kind this failure was produced from.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::NotAllowed(_) => OutcomeKind::NotAllowed,
            Self::Rejected(_) => OutcomeKind::Rejected,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }
}
