/// Core error taxonomy
///
/// Every store and manager operation returns `CoreResult<T>`. The variants
/// map one-to-one onto the HTTP statuses the API layer emits, so callers can
/// translate without inspecting messages.
///
/// All errors are terminal for the current request; the core never retries.

use thiserror::Error;

/// Result type used throughout the core
pub type CoreResult<T> = Result<T, CoreError>;

/// Unified error type for store and manager operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input, recoverable by the caller resubmitting
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced entity is absent
    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate membership, duplicate email, or an owner-removal attempt
    /// routed through the add path
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authenticated but not permitted
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Missing or invalid credential
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Store did not answer within its bounded timeout
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Unexpected database failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl CoreError {
    /// Shorthand for `NotFound` with an entity name
    pub fn not_found(entity: &str) -> Self {
        CoreError::NotFound(entity.to_string())
    }
}

/// Classifies sqlx failures into the core taxonomy.
///
/// Uniqueness races (two concurrent inserts of the same roster pair) surface
/// as `Conflict`; dangling references as `NotFound`; pool exhaustion and
/// shutdown as `Unavailable`. Everything else stays a `Database` error so the
/// API layer can suppress the detail.
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::not_found("resource"),
            sqlx::Error::PoolTimedOut => {
                CoreError::Unavailable("timed out waiting for a database connection".to_string())
            }
            sqlx::Error::PoolClosed => {
                CoreError::Unavailable("database connection pool is closed".to_string())
            }
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    let constraint = db_err.constraint().unwrap_or("unique constraint");
                    CoreError::Conflict(format!("duplicate entry ({constraint})"))
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    CoreError::not_found("referenced entity")
                }
                _ => CoreError::Database(sqlx::Error::Database(db_err)),
            },
            other => CoreError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Validation("project name must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "validation failed: project name must not be empty"
        );

        let err = CoreError::not_found("project");
        assert_eq!(err.to_string(), "project not found");

        let err = CoreError::Forbidden("only the project owner may delete it".to_string());
        assert!(err.to_string().starts_with("forbidden"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: CoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_unavailable() {
        let err: CoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, CoreError::Unavailable(_)));
    }
}
