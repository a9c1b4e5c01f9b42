//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A value collided with a column declared unique.
    #[error("unique constraint violated on {column}")]
    UniqueViolation { column: String },

    /// A reference pointed at a row that does not exist.
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StoreError {
    /// The conflicting column, if this is a uniqueness conflict.
    pub fn unique_column(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { column } => Some(column),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
