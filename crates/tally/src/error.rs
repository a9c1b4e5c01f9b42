//! Error types for Tally.

use tally_auth::AuthError;
use tally_core::{CalculationId, EvalError, UserId, ValidationError};
use tally_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Tally operations.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Input rejected before evaluation or persistence.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Evaluation failed.
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Hashing or token error.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    /// User persistence failed for a reason other than a taken name.
    #[error("{0}")]
    UserCreationFailed(String),

    /// Calculation persistence failed.
    #[error("{0}")]
    CalculationSaveFailed(String),

    #[error("calculation not found: {0}")]
    CalculationNotFound(CalculationId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TallyError {
    /// Whether the failure was caused by the caller's input and can be
    /// reported back to them as-is.
    pub fn is_client_error(&self) -> bool {
        match self {
            TallyError::Validation(_)
            | TallyError::Evaluation(_)
            | TallyError::UsernameTaken
            | TallyError::EmailTaken
            | TallyError::CalculationNotFound(_)
            | TallyError::UserNotFound(_) => true,
            TallyError::Auth(e) => matches!(e, AuthError::InvalidToken(_)),
            TallyError::Store(_)
            | TallyError::UserCreationFailed(_)
            | TallyError::CalculationSaveFailed(_)
            | TallyError::Config(_) => false,
        }
    }
}

/// Result type for Tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(TallyError::UsernameTaken.is_client_error());
        assert!(TallyError::from(ValidationError::DivisionByZero).is_client_error());
        assert!(TallyError::from(AuthError::InvalidToken("expired".into())).is_client_error());

        assert!(!TallyError::UserCreationFailed("User creation failed".into()).is_client_error());
        assert!(!TallyError::from(StoreError::Migration("x".into())).is_client_error());
        assert!(!TallyError::from(AuthError::Hashing("x".into())).is_client_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(TallyError::UsernameTaken.to_string(), "Username already exists");
        assert_eq!(TallyError::EmailTaken.to_string(), "Email already exists");
        assert_eq!(
            TallyError::from(ValidationError::DivisionByZero).to_string(),
            "validation error: Division by zero is not allowed"
        );
    }
}
