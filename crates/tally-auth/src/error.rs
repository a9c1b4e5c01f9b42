//! Error types for credential operations.

use thiserror::Error;

/// Errors that can occur during hashing or token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid auth configuration: {0}")]
    Config(String),
}

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, AuthError>;
