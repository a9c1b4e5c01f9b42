//! Credential configuration, read once at startup.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Placeholder secret for local development. Replace it in production.
pub const DEV_SECRET_KEY: &str = "your-secret-key-change-this-in-production";

/// Settings for password hashing and token signing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Server-side signing secret.
    pub secret_key: String,
    /// JWT algorithm identifier (`HS256`, `HS384` or `HS512`).
    pub algorithm: String,
    /// Lifetime of access tokens issued at login.
    pub access_token_ttl_minutes: u64,
    /// bcrypt cost factor (4..=31).
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: DEV_SECRET_KEY.to_string(),
            algorithm: "HS256".to_string(),
            access_token_ttl_minutes: 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Defaults with a freshly generated 32-byte secret.
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self {
            secret_key: hex::encode(secret),
            ..Self::default()
        }
    }

    /// Lifetime of access tokens issued at login.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_minutes.saturating_mul(60))
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
