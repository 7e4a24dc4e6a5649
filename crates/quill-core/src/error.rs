//! Domain-level error types.

use thiserror::Error;

use crate::domain::StatusViolation;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(#[from] StatusViolation),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The stored row no longer carries the version the writer read.
    #[error("Version conflict on article {id}: expected version {expected}")]
    VersionConflict { id: i64, expected: i32 },
}

impl RepoError {
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, RepoError::VersionConflict { .. })
    }
}

/// Errors raised by the timer facility.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("Timer backend error: {0}")]
    Backend(String),
}
