//! # Tally Testkit
//!
//! Testing utilities for Tally.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Known cases**: evaluation and user-policy inputs with their expected
//!   outcomes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A ready-to-use [`Tally`](tally::Tally) with a fast bcrypt
//!   cost and helpers for common setup
//!
//! ## Known Cases
//!
//! ```rust
//! use tally_testkit::cases::{evaluation_cases, verify_evaluation_cases};
//!
//! for case in evaluation_cases() {
//!     println!("{}: {} {} {}", case.name, case.a, case.kind, case.b);
//! }
//! verify_evaluation_cases().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tally_testkit::generators::{valid_password, valid_username};
//! use tally_core::{validate_password, validate_username};
//!
//! proptest! {
//!     #[test]
//!     fn generated_credentials_pass(name in valid_username(), pw in valid_password()) {
//!         prop_assert!(validate_username(&name).is_ok());
//!         prop_assert!(validate_password(&pw).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use tally_testkit::fixtures::TestFixture;
//! use tally_core::OperationKind;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let alice = fixture.register("alice").await;
//!     let calc = fixture.calculate(Some(alice.id), 2.0, 3.0, OperationKind::Add).await;
//!     assert_eq!(calc.result, Some(5.0));
//! }
//! ```

pub mod cases;
pub mod fixtures;
pub mod generators;

pub use cases::{
    evaluation_cases, user_policy_cases, verify_evaluation_cases, verify_user_policy_cases,
    EvaluationCase, UserPolicyCase,
};
pub use fixtures::{fixture_config, TestFixture, DEFAULT_PASSWORD};
pub use generators::{calculation_create, CalculationParams};
