//! # Database Error Types
//!
//! Error types for persistence and service operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (rejections)     sqlx / io / csv errors                     │
//! │       │                             │                                   │
//! │       ▼                             ▼                                   │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  hotel-cli prints the message and exits non-zero                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use hotel_core::CoreError;
use thiserror::Error;

/// Persistence and service errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A business rule rejected the operation. Nothing was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Adding a user whose username is taken
    /// - Inserting a second item with an existing name
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The durable medium could not be read or written.
    ///
    /// Writes fail closed: when this is returned from a mutation, the store
    /// is in its pre-call state.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A multi-file write stopped halfway.
    ///
    /// Only used inside the flat-file backend between detecting the damage
    /// and repairing it; callers see `PersistenceUnavailable` instead.
    #[error("Partial write detected: {0}")]
    PartialWriteDetected(String),

    /// The archive sink could not be written. No reset happened.
    #[error("Archive failed: {0}")]
    ArchiveFailed(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// The business rejection behind this error, if any.
    pub fn as_rejection(&self) -> Option<&CoreError> {
        match self {
            DbError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → UNIQUE → UniqueViolation, else unavailable
/// Other                       → DbError::PersistenceUnavailable
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::PersistenceUnavailable(msg.to_string())
                }
            }

            _ => DbError::PersistenceUnavailable(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::PersistenceUnavailable(err.to_string())
    }
}

impl From<csv::Error> for DbError {
    fn from(err: csv::Error) -> Self {
        DbError::ArchiveFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_transparent() {
        let err: DbError = CoreError::UnknownItem("Lobster".to_string()).into();
        assert_eq!(err.to_string(), "Unknown item: Lobster");
        assert!(err.as_rejection().is_some());
    }

    #[test]
    fn test_io_error_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: DbError = io.into();
        assert!(matches!(err, DbError::PersistenceUnavailable(_)));
        assert!(err.as_rejection().is_none());
    }
}
