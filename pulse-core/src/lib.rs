pub mod models;
pub mod repository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Storage-layer error surfaced through the repository traits.
///
/// `UniqueViolation` is load-bearing: the booking ledger carries unique
/// indexes on (date, start_time, trainer_id) and (date, start_time, zone_id),
/// and a violated index is the authoritative conflict signal when two writers
/// race past the application-level check.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("row not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
