//! Builder for constructing outcome matchers.

use crate::builder::error::BuildError;
use crate::core::{ChangeResult, Handler, OutcomeKind, OutcomeMatcher};
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for [`OutcomeMatcher`] with a fluent API.
///
/// `build` fails unless every outcome kind has a handler or a fallback
/// was provided with [`otherwise`](Self::otherwise).
pub struct OutcomeMatcherBuilder<'h, D, R> {
    handlers: HashMap<OutcomeKind, Handler<'h, D, R>>,
    fallback: Option<Handler<'h, D, R>>,
}

impl<'h, D, R> OutcomeMatcher<'h, D, R> {
    pub fn builder() -> OutcomeMatcherBuilder<'h, D, R> {
        OutcomeMatcherBuilder::new()
    }
}

impl<'h, D, R> OutcomeMatcherBuilder<'h, D, R> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Handle outcomes of `kind`. Replaces any earlier handler for that kind.
    pub fn on<F>(mut self, kind: OutcomeKind, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    pub fn on_not_allowed<F>(self, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.on(OutcomeKind::NotAllowed, handler)
    }

    pub fn on_accepted<F>(self, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.on(OutcomeKind::Accepted, handler)
    }

    pub fn on_adjusted<F>(self, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.on(OutcomeKind::Adjusted, handler)
    }

    pub fn on_rejected<F>(self, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.on(OutcomeKind::Rejected, handler)
    }

    pub fn on_failed<F>(self, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.on(OutcomeKind::Failed, handler)
    }

    /// Handle every kind without a dedicated handler.
    pub fn otherwise<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ChangeResult<'_, D>) -> R + 'h,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Build the matcher.
    /// Returns an error listing every kind left without a handler.
    pub fn build(mut self) -> Result<OutcomeMatcher<'h, D, R>, BuildError> {
        let mut table = Vec::with_capacity(OutcomeKind::ALL.len());
        let mut missing = Vec::new();

        for kind in OutcomeKind::ALL {
            match self.handlers.remove(&kind).or_else(|| self.fallback.clone()) {
                Some(handler) => table.push(handler),
                None => missing.push(kind),
            }
        }

        if !missing.is_empty() {
            return Err(BuildError::UnhandledOutcomes { kinds: missing });
        }

        Ok(OutcomeMatcher::from_table(table))
    }
}

impl<'h, D, R> Default for OutcomeMatcherBuilder<'h, D, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_reports_every_kind() {
        let result = OutcomeMatcherBuilder::<i32, ()>::new().build();

        match result {
            Err(BuildError::UnhandledOutcomes { kinds }) => {
                assert_eq!(kinds, OutcomeKind::ALL.to_vec())
            }
            _ => panic!("Expected UnhandledOutcomes"),
        }
    }

    #[test]
    fn fallback_alone_is_complete() {
        let result = OutcomeMatcherBuilder::<i32, ()>::new()
            .otherwise(|_| ())
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn handlers_may_borrow_local_state() {
        let prefix = String::from("kind: ");
        let matcher = OutcomeMatcherBuilder::<i32, String>::new()
            .otherwise(|o| format!("{prefix}{}", o.kind()))
            .build()
            .unwrap();

        let store = crate::Store::new(1);
        assert_eq!(matcher.apply(&store.change(|x| x + 1)), "kind: Accepted");
    }
}
