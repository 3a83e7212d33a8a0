//! Database error types for school-db.

use thiserror::Error;

use school_core::enums::EntityType;
use school_core::errors::CoreError;
use school_core::validation::ValidationErrors;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A candidate record failed field validation or uniqueness. Carries every
    /// failing field, not just the first.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A restrict policy blocked the delete. Nothing was removed.
    /// `entity_type`/`id` name the record owning the blocking children.
    #[error("Cannot delete {entity_type} {id}: dependent records exist through '{relationship}'")]
    DeleteRestricted {
        entity_type: EntityType,
        id: String,
        relationship: &'static str,
    },

    /// The referenced record does not exist.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: String },

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => Self::Validation(errors),
            CoreError::Other(other) => Self::Other(other),
        }
    }
}

impl DatabaseError {
    /// The validation failures, when this is a validation error.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
