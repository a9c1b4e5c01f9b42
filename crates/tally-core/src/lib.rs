//! # Tally Core
//!
//! Pure primitives for Tally: arithmetic operations, calculation records,
//! user records, and the validation rules applied before anything is
//! evaluated or persisted.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`OperationKind`] - The closed set of arithmetic operations
//! - [`Calculation`] - A stored, evaluated calculation
//! - [`User`] - A registered identity (holds a password hash, never a password)
//! - [`CalculationId`], [`UserId`] - Store-assigned identifiers
//!
//! ## Evaluation
//!
//! [`evaluate`] maps an operation kind and two operands to a result. It
//! rejects division by zero on its own, independently of [`validation`].

pub mod calculation;
pub mod error;
pub mod operation;
pub mod types;
pub mod user;
pub mod validation;

pub use calculation::{Calculation, CalculationCreate, CalculationUpdate, NewCalculation};
pub use error::{EvalError, ValidationError};
pub use operation::{evaluate, evaluate_named, is_supported, supported_kinds, OperationKind};
pub use types::{now_millis, CalculationId, UserId};
pub use user::{LoginInput, NewUser, User, UserCreate};
pub use validation::{
    coerce_operand, validate_calculation_create, validate_calculation_update, validate_email,
    validate_login, validate_new_user, validate_password, validate_username, CalculationChanges,
    ValidCalculation,
};
