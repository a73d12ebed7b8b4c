use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Infrastructure error type shared by all stores.
///
/// Domain rejections (conflicts, not-found, validation) are NOT modeled
/// here; each service has its own error enum in `errors::domain`. Stores
/// return `InternalError` and the service layer translates.
#[derive(Error, Debug)]
pub enum InternalError {
    /// Database query or write failed
    #[error("database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: DbErr,
    },

    /// Transaction begin/commit failed
    #[error("transaction error: {operation} failed: {source}")]
    Transaction {
        operation: String,
        #[source]
        source: DbErr,
    },

    /// A unique index rejected a write. Kept distinct from `Database` so
    /// services can translate it into the matching domain conflict.
    #[error("unique constraint violated in {operation}")]
    UniqueViolation { operation: String },
}

impl InternalError {
    /// Wrap a database error with the name of the failing operation.
    ///
    /// Unique-constraint violations are detected here so no caller has to
    /// inspect `DbErr` directly.
    pub fn database(operation: impl Into<String>, source: DbErr) -> Self {
        let operation = operation.into();
        if matches!(source.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return Self::UniqueViolation { operation };
        }
        Self::Database { operation, source }
    }

    pub fn transaction(operation: impl Into<String>, source: DbErr) -> Self {
        Self::Transaction {
            operation: operation.into(),
            source,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}
