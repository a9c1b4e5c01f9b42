//! The credential service: hashing plus token issue and verification,
//! configured once from [`AuthConfig`].

use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::password::{self, MAX_COST, MIN_COST};
use crate::token::{Claims, TokenSigner, DEFAULT_TOKEN_TTL};

/// Password checked against the placeholder digest when no account exists.
const PLACEHOLDER_PASSWORD: &str = "tally-placeholder-credential";

/// Hashes passwords and issues/verifies access tokens.
pub struct CredentialService {
    config: AuthConfig,
    signer: TokenSigner,
    /// Digest verified against when the account is unknown, so both
    /// failure paths of a login pay for one bcrypt verification.
    placeholder_hash: String,
}

impl CredentialService {
    /// Build the service, rejecting unusable configuration up front.
    pub fn new(config: AuthConfig) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&config.bcrypt_cost) {
            return Err(AuthError::Config(format!(
                "bcrypt cost must be within {}..={}, got {}",
                MIN_COST, MAX_COST, config.bcrypt_cost
            )));
        }
        let signer = TokenSigner::new(&config.secret_key, &config.algorithm)?;
        let placeholder_hash = password::hash_password(PLACEHOLDER_PASSWORD, config.bcrypt_cost)?;

        tracing::debug!(
            algorithm = %config.algorithm,
            cost = config.bcrypt_cost,
            "credential service ready"
        );

        Ok(Self {
            config,
            signer,
            placeholder_hash,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Passwords
    // ─────────────────────────────────────────────────────────────────────────

    /// Hash a password at the configured cost.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        password::hash_password(password, self.config.bcrypt_cost)
    }

    /// Check a password against a stored digest.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        password::verify_password(password, hash)
    }

    /// Spend one verification on the placeholder digest. Always `false`.
    pub fn verify_placeholder(&self, password: &str) -> bool {
        let _ = password::verify_password(password, &self.placeholder_hash);
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tokens
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a token for arbitrary claims.
    ///
    /// Without an explicit `ttl` the token lives for [`DEFAULT_TOKEN_TTL`].
    pub fn issue_token(
        &self,
        claims: &Map<String, Value>,
        ttl: Option<Duration>,
    ) -> Result<String> {
        self.signer.issue(claims, ttl.unwrap_or(DEFAULT_TOKEN_TTL))
    }

    /// Issue a login token for `subject` using the configured lifetime.
    pub fn issue_access_token(&self, subject: &str) -> Result<String> {
        let mut claims = Map::new();
        claims.insert("sub".into(), Value::String(subject.to_string()));
        self.signer.issue(&claims, self.config.access_token_ttl())
    }

    /// Sign a fully specified claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        self.signer.sign(claims)
    }

    /// Verify a token and return its decoded claims.
    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        self.signer.decode(token)
    }

    /// Verify a token and return its subject.
    pub fn verify_token(&self, token: &str) -> Result<String> {
        self.signer.verify(token).map_err(|e| {
            tracing::warn!(error = %e, "token rejected");
            e
        })
    }
}
