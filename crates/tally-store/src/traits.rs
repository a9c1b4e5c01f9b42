//! Store trait: the abstract interface for user and calculation persistence.
//!
//! This trait keeps the services storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use tally_core::{
    Calculation, CalculationId, NewCalculation, NewUser, OperationKind, User, UserId,
};

use crate::error::Result;

/// Selection criteria for listing calculations. Empty matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationFilter {
    /// Only calculations owned by this user.
    pub user_id: Option<UserId>,
    /// Only calculations of this kind.
    pub kind: Option<OperationKind>,
}

impl CalculationFilter {
    /// Match calculations owned by `user_id`.
    pub fn owned_by(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            kind: None,
        }
    }

    /// Additionally restrict to `kind`.
    pub fn kind(mut self, kind: OperationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether `calc` satisfies this filter.
    pub fn matches(&self, calc: &Calculation) -> bool {
        self.user_id.map_or(true, |id| calc.user_id == Some(id))
            && self.kind.map_or(true, |kind| calc.kind == kind)
    }
}

/// The Store trait: async interface for persistence.
///
/// For SQLite, operations run on `spawn_blocking` so the runtime is never
/// blocked on disk I/O.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a user, assigning id and `created_at`.
    ///
    /// Fails with `UniqueViolation` naming `username` or `email` when either
    /// value is already taken. Nothing is persisted on failure.
    async fn insert_user(&self, user: &NewUser) -> Result<User>;

    /// Get a user by id.
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Get a user by exact username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get a user by exact email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Calculation Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a calculation, assigning id and `created_at`.
    ///
    /// Fails with `ForeignKeyViolation` if the owner does not exist.
    async fn insert_calculation(&self, calc: &NewCalculation) -> Result<Calculation>;

    /// Get a calculation by id.
    async fn get_calculation(&self, id: CalculationId) -> Result<Option<Calculation>>;

    /// Overwrite the mutable fields (`a`, `b`, `kind`, `result`) of a stored
    /// calculation and stamp `updated_at`. `created_at` and the owner are
    /// never changed.
    ///
    /// Fails with `NotFound` if the calculation does not exist.
    async fn update_calculation(&self, calc: &Calculation) -> Result<Calculation>;

    /// Delete a calculation. Returns whether a row was removed.
    async fn delete_calculation(&self, id: CalculationId) -> Result<bool>;

    /// List calculations matching `filter`, ordered by id.
    async fn list_calculations(&self, filter: &CalculationFilter) -> Result<Vec<Calculation>>;

    /// Count calculations matching `filter`.
    async fn count_calculations(&self, filter: &CalculationFilter) -> Result<u64>;
}
