//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Fixtures use the lowest bcrypt
//! cost and a random secret, and panic on setup failures.

use tally::{Tally, TallyConfig};
use tally_auth::AuthConfig;
use tally_core::{
    Calculation, CalculationCreate, LoginInput, OperationKind, User, UserCreate, UserId,
};
use tally_store::{MemoryStore, SqliteStore, Store};

/// Password used by [`TestFixture::register`]; satisfies the policy.
pub const DEFAULT_PASSWORD: &str = "Passw0rd1";

/// Configuration with a fresh secret and the cheapest bcrypt cost.
pub fn fixture_config() -> TallyConfig {
    TallyConfig {
        database_url: "sqlite::memory:".into(),
        auth: AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::with_random_secret()
        },
    }
}

/// A Tally instance ready for tests.
pub struct TestFixture<S: Store = MemoryStore> {
    pub tally: Tally<S>,
}

impl TestFixture<MemoryStore> {
    /// Fixture over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for TestFixture<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture<SqliteStore> {
    /// Fixture over an in-memory SQLite database.
    pub fn sqlite() -> Self {
        Self::with_store(SqliteStore::open_memory().expect("open in-memory sqlite"))
    }
}

impl<S: Store> TestFixture<S> {
    /// Fixture over an arbitrary store.
    pub fn with_store(store: S) -> Self {
        Self {
            tally: Tally::new(store, fixture_config()).expect("fixture config is valid"),
        }
    }

    /// Register `username` with `<username>@example.com` and
    /// [`DEFAULT_PASSWORD`].
    pub async fn register(&self, username: &str) -> User {
        self.tally
            .users()
            .create_user(&UserCreate::new(
                username,
                format!("{username}@example.com"),
                DEFAULT_PASSWORD,
            ))
            .await
            .expect("register fixture user")
    }

    /// Register `count` users named `user_0`, `user_1`, ...
    pub async fn register_many(&self, count: usize) -> Vec<User> {
        let mut users = Vec::with_capacity(count);
        for i in 0..count {
            users.push(self.register(&format!("user_{i}")).await);
        }
        users
    }

    /// Log in a user registered through [`Self::register`] and return the
    /// raw access token.
    pub async fn login(&self, username: &str) -> String {
        self.tally
            .users()
            .login(&LoginInput::new(username, DEFAULT_PASSWORD))
            .await
            .expect("login call")
            .expect("fixture credentials accepted")
            .access_token
    }

    /// Create and evaluate a calculation.
    pub async fn calculate(
        &self,
        owner: Option<UserId>,
        a: f64,
        b: f64,
        kind: OperationKind,
    ) -> Calculation {
        self.tally
            .calculations()
            .create(owner, &CalculationCreate::new(a, b, kind))
            .await
            .expect("create fixture calculation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_store::CalculationFilter;

    #[tokio::test]
    async fn test_register_and_login() {
        let fixture = TestFixture::new();
        let alice = fixture.register("alice").await;
        assert_eq!(alice.email, "alice@example.com");

        let token = fixture.login("alice").await;
        let me = fixture.tally.users().current_user(&token).await.unwrap();
        assert_eq!(me.id, alice.id);
    }

    #[tokio::test]
    async fn test_register_many() {
        let fixture = TestFixture::sqlite();
        let users = fixture.register_many(3).await;

        assert_eq!(users.len(), 3);
        assert_ne!(users[0].id, users[1].id);
        assert_ne!(users[1].id, users[2].id);
    }

    #[tokio::test]
    async fn test_calculate() {
        let fixture = TestFixture::new();
        let alice = fixture.register("alice").await;

        let calc = fixture
            .calculate(Some(alice.id), 6.0, 3.0, OperationKind::Divide)
            .await;
        assert_eq!(calc.result, Some(2.0));

        let owned = fixture
            .tally
            .calculations()
            .count(&CalculationFilter::owned_by(alice.id))
            .await
            .unwrap();
        assert_eq!(owned, 1);
    }
}
