//! Cross-cutting error types for the pure layer.
//!
//! Storage errors (`DatabaseError`) live in `school-db` and absorb these via `From`.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors raised by pure operations on curriculum records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more fields failed validation. Carries every failing field.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
