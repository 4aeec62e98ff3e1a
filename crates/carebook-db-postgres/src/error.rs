//! Error types for the PostgreSQL storage backend.

use sqlx_core::error::Error as SqlxError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested row was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity that was not found.
        entity: String,
        /// The identifier that did not resolve.
        id: String,
    },

    /// A uniqueness or state conflict.
    #[error("{message}")]
    Conflict {
        /// Human-readable conflict description.
        message: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Maps a sqlx error to a `Conflict` when it is a unique violation,
/// choosing the message by the violated constraint name.
pub(crate) fn map_unique_violation(
    err: SqlxError,
    messages: &[(&str, &str)],
    fallback: &str,
) -> StorageError {
    if let SqlxError::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        let message = db_err
            .constraint()
            .and_then(|name| {
                messages
                    .iter()
                    .find(|(constraint, _)| *constraint == name)
                    .map(|(_, msg)| *msg)
            })
            .unwrap_or(fallback);
        return StorageError::conflict(message);
    }
    StorageError::from(err)
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("Hospital", 42);
        assert_eq!(err.to_string(), "Hospital not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());

        let err = StorageError::conflict("Username already taken.");
        assert_eq!(err.to_string(), "Username already taken.");
        assert!(err.is_conflict());
    }

    #[test]
    fn test_non_unique_violation_passes_through() {
        let err = map_unique_violation(SqlxError::PoolClosed, &[], "conflict");
        assert!(matches!(err, StorageError::Database(_)));
    }
}
