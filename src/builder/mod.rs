//! Builder API for ergonomic store and matcher construction.
//!
//! This module provides fluent builders that validate configuration up
//! front, so contract violations surface as [`BuildError`] at construction
//! time rather than during a change.

pub mod error;
pub mod matcher;
pub mod store;

pub use error::BuildError;
pub use matcher::OutcomeMatcherBuilder;
pub use store::StoreBuilder;
