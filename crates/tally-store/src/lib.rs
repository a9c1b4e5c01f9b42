//! # Tally Store
//!
//! Persistence boundary for Tally. Provides a trait-based interface for
//! user and calculation storage with SQLite and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`CalculationFilter`] - Selection criteria for browsing calculations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tally_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     // Open a SQLite database from a connection string
//!     let store = SqliteStore::connect("sqlite://tally.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let user = store.get_user_by_username("alice").await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Store-assigned fields**: ids, `created_at` and `updated_at` are set here.
//! - **Uniqueness**: duplicate usernames or emails surface as
//!   [`StoreError::UniqueViolation`] naming the column; callers translate it.
//! - **Scoped sessions**: every operation holds the connection for its own
//!   duration only; writes run inside a transaction that rolls back on any
//!   error path.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CalculationFilter, Store};
