//! The Tally handle: one store, one credential service, one configuration.

use std::sync::Arc;

use tally_auth::CredentialService;
use tally_store::{SqliteStore, Store};

use crate::calculations::CalculationService;
use crate::config::TallyConfig;
use crate::error::Result;
use crate::users::UserService;

/// Entry point for all Tally operations.
///
/// Owns the storage backend and the credential service; hands out cheap
/// service views that share them.
pub struct Tally<S: Store> {
    store: Arc<S>,
    credentials: Arc<CredentialService>,
    config: TallyConfig,
}

impl<S: Store> Tally<S> {
    /// Create a Tally instance over `store`.
    ///
    /// Fails if the auth configuration is unusable (empty secret,
    /// unsupported algorithm, bcrypt cost out of range).
    pub fn new(store: S, config: TallyConfig) -> Result<Self> {
        let credentials = CredentialService::new(config.auth.clone())?;
        Ok(Self {
            store: Arc::new(store),
            credentials: Arc::new(credentials),
            config,
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration this instance was built with.
    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    /// The credential service.
    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    /// User registration, lookup and authentication.
    pub fn users(&self) -> UserService<S> {
        UserService::new(Arc::clone(&self.store), Arc::clone(&self.credentials))
    }

    /// Calculation create/read/update/delete.
    pub fn calculations(&self) -> CalculationService<S> {
        CalculationService::new(Arc::clone(&self.store))
    }
}

impl Tally<SqliteStore> {
    /// Connect to `config.database_url` and build an instance over it.
    pub fn open(config: TallyConfig) -> Result<Self> {
        let store = SqliteStore::connect(&config.database_url)?;
        tracing::info!(store = database_kind(&config.database_url), "tally store opened");
        Self::new(store, config)
    }
}

/// Coarse label for a connection string, safe to log.
fn database_kind(database_url: &str) -> &'static str {
    match database_url {
        "sqlite::memory:" | ":memory:" => "sqlite-memory",
        _ => "sqlite-file",
    }
}
