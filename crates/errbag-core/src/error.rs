//! Error types for errbag operations.
//!
//! Absence (unknown field, unknown scope, unknown rule) is never an error;
//! queries resolve it to `None` or empty collections. The enum below covers
//! the two conditions the contract treats as real failures.

use thiserror::Error;

/// Failures surfaced by [`crate::ErrorBag`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BagError {
    /// Selector text that does not match the grammar. Programmer error,
    /// reported fail-fast instead of silently misparsing.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    /// Strict removal referenced an id with no stored sequence.
    #[error("not found: {0}")]
    NotFound(String),
}
