//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    /// The record moved past `expected_version` before our write committed.
    /// Safe to retry after re-reading.
    #[error("Version conflict on {id}: expected version {expected_version}")]
    Conflict { id: Uuid, expected_version: i64 },

    /// Store unreachable or timed out. Safe to retry.
    #[error("Transient failure: {0}")]
    Transient(String),
}

impl DomainError {
    pub fn movie_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Movie",
            id,
        }
    }

    /// Whether the caller may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Transient(_))
    }
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

    #[error("Version conflict: expected {expected}")]
    VersionConflict { expected: i64 },

    #[error("Store operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl RepoError {
    /// Lift a repository error into the domain, attributing it to `id`.
    pub fn for_movie(self, id: Uuid) -> DomainError {
        match self {
            RepoError::NotFound => DomainError::movie_not_found(id),
            RepoError::VersionConflict { expected } => DomainError::Conflict {
                id,
                expected_version: expected,
            },
            other => other.into(),
        }
    }
}

/// Used for calls that carry no record id (`find_all`, `insert`); id-bearing
/// calls go through [`RepoError::for_movie`].
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Transient(err.to_string())
    }
}
