//! Startup configuration.
//!
//! Loaded once, then handed by value to [`crate::Tally::new`]. Environment
//! variables map to fields as follows:
//!
//! | variable                      | field                            |
//! |-------------------------------|----------------------------------|
//! | `DATABASE_URL`                | `database_url`                   |
//! | `SECRET_KEY`                  | `auth.secret_key`                |
//! | `ALGORITHM`                   | `auth.algorithm`                 |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | `auth.access_token_ttl_minutes`  |
//! | `BCRYPT_COST`                 | `auth.bcrypt_cost`               |

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tally_auth::AuthConfig;

use crate::error::{Result, TallyError};

/// Database used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tally.db";

const ENV_KEYS: &[&str] = &[
    "DATABASE_URL",
    "SECRET_KEY",
    "ALGORITHM",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
    "BCRYPT_COST",
];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// `sqlite::memory:`, `sqlite://path` or a bare file path.
    pub database_url: String,
    /// Hashing and token settings.
    pub auth: AuthConfig,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl TallyConfig {
    /// Defaults overlaid with whichever of the known environment variables
    /// are set.
    pub fn from_env() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Settings::default()))
                .merge(Env::raw().only(ENV_KEYS)),
        )
    }

    /// Extract from an arbitrary figment using the flat setting names
    /// (`database_url`, `secret_key`, `algorithm`,
    /// `access_token_expire_minutes`, `bcrypt_cost`). Missing keys keep
    /// their defaults.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| TallyError::Config(e.to_string()))?;
        Ok(settings.into())
    }
}

/// Flat on-the-wire shape of the configuration.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    database_url: String,
    secret_key: String,
    algorithm: String,
    access_token_expire_minutes: u64,
    bcrypt_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let auth = AuthConfig::default();
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            secret_key: auth.secret_key,
            algorithm: auth.algorithm,
            access_token_expire_minutes: auth.access_token_ttl_minutes,
            bcrypt_cost: auth.bcrypt_cost,
        }
    }
}

impl From<Settings> for TallyConfig {
    fn from(s: Settings) -> Self {
        Self {
            database_url: s.database_url,
            auth: AuthConfig {
                secret_key: s.secret_key,
                algorithm: s.algorithm,
                access_token_ttl_minutes: s.access_token_expire_minutes,
                bcrypt_cost: s.bcrypt_cost,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = TallyConfig::default();
        assert_eq!(config.database_url, "sqlite://tally.db");
        assert_eq!(config.auth.algorithm, "HS256");
        assert_eq!(config.auth.access_token_ttl_minutes, 30);
    }

    #[test]
    fn test_from_env_reads_each_variable() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite::memory:");
            jail.set_env("SECRET_KEY", "env-secret");
            jail.set_env("ALGORITHM", "HS512");
            jail.set_env("ACCESS_TOKEN_EXPIRE_MINUTES", "7");
            jail.set_env("BCRYPT_COST", "5");
            jail.set_env("PORT", "8080");
            jail.set_env("TALLY_SECRET_KEY", "ignored");

            let config = TallyConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config.database_url, "sqlite::memory:");
            assert_eq!(config.auth.secret_key, "env-secret");
            assert_eq!(config.auth.algorithm, "HS512");
            assert_eq!(config.auth.access_token_ttl_minutes, 7);
            assert_eq!(config.auth.bcrypt_cost, 5);
            Ok(())
        });
    }

    #[test]
    fn test_from_env_rejects_non_numeric_cost() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BCRYPT_COST", "twelve");
            assert!(matches!(TallyConfig::from_env(), Err(TallyError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_empty_figment_yields_defaults() {
        let config = TallyConfig::from_figment(Figment::new()).unwrap();
        assert_eq!(config, TallyConfig::default());
    }

    #[test]
    fn test_flat_keys_override() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "database_url": "sqlite::memory:",
            "secret_key": "s3cret",
            "algorithm": "HS512",
            "access_token_expire_minutes": 5,
            "bcrypt_cost": 4
        })));
        let config = TallyConfig::from_figment(figment).unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.auth.secret_key, "s3cret");
        assert_eq!(config.auth.algorithm, "HS512");
        assert_eq!(config.auth.access_token_ttl_minutes, 5);
        assert_eq!(config.auth.bcrypt_cost, 4);
    }

    #[test]
    fn test_later_layers_win() {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Serialized::defaults(json!({ "algorithm": "HS384" })));
        let config = TallyConfig::from_figment(figment).unwrap();
        assert_eq!(config.auth.algorithm, "HS384");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_bad_type_is_config_error() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "bcrypt_cost": "lots"
        })));
        assert!(matches!(
            TallyConfig::from_figment(figment),
            Err(TallyError::Config(_))
        ));
    }
}
