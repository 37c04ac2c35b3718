/// Domain error type shared by the engines in [`crate::services`]
///
/// Every engine validates all of its preconditions before it writes, and
/// reports the first violated one as a `DomainError`. The API layer maps each
/// variant onto an HTTP status:
///
/// | Variant      | Status |
/// |--------------|--------|
/// | `Validation` | 422    |
/// | `NotFound`   | 404    |
/// | `Conflict`   | 409    |
/// | `Forbidden`  | 403    |
/// | `Password`   | 500    |
/// | `Database`   | 500    |

use crate::auth::password::PasswordError;

/// Result alias used by the services
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Input violates a policy (short password, empty member list, ...)
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Entity is absent, or not visible to the caller
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Authenticated but not allowed to mutate this entity
    #[error("{0}")]
    Forbidden(String),

    /// Hashing or verifying a password failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        DomainError::NotFound(detail.into())
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        DomainError::Conflict(detail.into())
    }

    pub fn forbidden() -> Self {
        DomainError::Forbidden("Not enough permissions".to_string())
    }

    /// Maps a unique-index violation raised by a write to `Conflict`
    ///
    /// The pre-checks in the services are a fast path; the unique indexes
    /// are what actually guarantees uniqueness under concurrent writers.
    pub fn from_write(err: sqlx::Error, conflict_detail: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::Conflict(conflict_detail.to_string())
            }
            _ => DomainError::Database(err),
        }
    }

    /// Maps a foreign-key violation raised by a delete to `Conflict`
    pub fn from_delete(err: sqlx::Error, conflict_detail: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DomainError::Conflict(conflict_detail.to_string())
            }
            _ => DomainError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DomainError::validation("password", "too short");
        assert_eq!(err.to_string(), "Invalid password: too short");

        let err = DomainError::not_found("Team not found");
        assert_eq!(err.to_string(), "Team not found");

        assert_eq!(DomainError::forbidden().to_string(), "Not enough permissions");
    }

    #[test]
    fn test_from_write_passes_through_other_errors() {
        let err = DomainError::from_write(sqlx::Error::RowNotFound, "Team already created");
        assert!(matches!(err, DomainError::Database(sqlx::Error::RowNotFound)));
    }
}
