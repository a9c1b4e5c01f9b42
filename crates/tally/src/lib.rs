//! # Tally
//!
//! The unified API for Tally: validated arithmetic calculations recorded
//! per user, with password-based accounts and signed access tokens.
//!
//! ## Overview
//!
//! - **Calculations**: operands are validated and coerced, evaluated, and
//!   persisted together with the result. Division by zero is rejected both
//!   by validation and by the evaluator itself.
//! - **Users**: usernames and emails are unique; passwords are stored only
//!   as salted bcrypt digests.
//! - **Tokens**: a successful login yields a signed, time-limited token
//!   that resolves back to the user.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tally::{Tally, TallyConfig};
//! use tally::core::{CalculationCreate, LoginInput, OperationKind, UserCreate};
//!
//! async fn example() {
//!     let config = TallyConfig::from_env().unwrap();
//!     let tally = Tally::open(config).unwrap();
//!
//!     let user = tally
//!         .users()
//!         .create_user(&UserCreate::new("alice", "alice@example.com", "Passw0rd!"))
//!         .await
//!         .unwrap();
//!
//!     let calc = tally
//!         .calculations()
//!         .create(Some(user.id), &CalculationCreate::new(10.0, 5.0, OperationKind::Add))
//!         .await
//!         .unwrap();
//!     assert_eq!(calc.result, Some(15.0));
//!
//!     let token = tally
//!         .users()
//!         .login(&LoginInput::new("alice", "Passw0rd!"))
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `tally::core` - Operations, entities and validation
//! - `tally::store` - Storage abstraction, SQLite and in-memory stores
//! - `tally::auth` - Password hashing and tokens

pub mod calculations;
pub mod config;
pub mod error;
pub mod tally;
pub mod users;

// Re-export component crates
pub use tally_auth as auth;
pub use tally_core as core;
pub use tally_store as store;

// Re-export main types for convenience
pub use calculations::CalculationService;
pub use config::TallyConfig;
pub use error::{Result, TallyError};
pub use crate::tally::Tally;
pub use users::{AccessToken, UserService};

// Re-export commonly used core types
pub use tally_core::{
    Calculation, CalculationCreate, CalculationId, CalculationUpdate, LoginInput, OperationKind,
    User, UserCreate, UserId,
};
pub use tally_store::{CalculationFilter, MemoryStore, SqliteStore, Store};
