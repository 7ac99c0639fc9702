//! Custom error types for the common library
//!
//! Every persistence failure surfaces as a [`DatabaseError`]. Storage-level
//! constraint failures (uniqueness, `CHECK`, `NOT NULL`, foreign keys) are
//! folded into [`DatabaseError::ConstraintViolation`] so callers can turn them
//! into client errors without inspecting driver specifics.

use std::fmt::Display;

use sqlx::Error as SqlxError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while establishing the connection pool
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating the schema
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// Lookup by primary key found no row
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// A write broke a uniqueness, enumeration or required-field rule
    #[error("{0}")]
    ConstraintViolation(String),

    /// A stored value could not be turned back into its Rust type
    #[error("Corrupt value in column {column}: {detail}")]
    Corrupt { column: &'static str, detail: String },
}

impl DatabaseError {
    /// Build a [`DatabaseError::NotFound`] for the given entity and key
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Build a [`DatabaseError::ConstraintViolation`] with a client-facing message
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }

    /// True when the error is a primary-key miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the error is a rejected write
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            let message = db_err.message().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => return DatabaseError::ConstraintViolation(message),
                _ => {}
            }
        }
        DatabaseError::Query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = DatabaseError::not_found("User", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User 42 not found");
    }

    #[test]
    fn constraint_violation_keeps_message_verbatim() {
        let err = DatabaseError::constraint("Invalid province: Atlantis");
        assert!(err.is_constraint_violation());
        assert_eq!(err.to_string(), "Invalid province: Atlantis");
    }

    #[test]
    fn non_database_sqlx_errors_are_query_errors() {
        let err: DatabaseError = SqlxError::RowNotFound.into();
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
