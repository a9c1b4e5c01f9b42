//! Error types for Tally Core.

use thiserror::Error;

/// Errors raised by the operation evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Unsupported operation type: {0}")]
    UnsupportedOperation(String),
}

/// Validation errors for calculation and user input.
///
/// Message-carrying variants hold the human-readable rule that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Unsupported operation type: {0}")]
    UnsupportedOperation(String),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),
}

impl From<EvalError> for ValidationError {
    fn from(e: EvalError) -> Self {
        match e {
            EvalError::DivisionByZero => ValidationError::DivisionByZero,
            EvalError::UnsupportedOperation(name) => ValidationError::UnsupportedOperation(name),
        }
    }
}
