//! User registration, lookup, authentication and login.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tally_auth::{AuthError, CredentialService};
use tally_core::{validate_login, validate_new_user, LoginInput, NewUser, User, UserCreate, UserId};
use tally_store::{Store, StoreError};

use crate::error::{Result, TallyError};

/// Token handed back by a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// User operations over a shared store and credential service.
pub struct UserService<S: Store> {
    store: Arc<S>,
    credentials: Arc<CredentialService>,
}

impl<S: Store> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<S: Store> UserService<S> {
    pub(crate) fn new(store: Arc<S>, credentials: Arc<CredentialService>) -> Self {
        Self { store, credentials }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate, hash and persist a new user.
    ///
    /// A taken username or email is reported as [`TallyError::UsernameTaken`]
    /// or [`TallyError::EmailTaken`]; any other store failure becomes
    /// [`TallyError::UserCreationFailed`]. Nothing is persisted on failure.
    pub async fn create_user(&self, input: &UserCreate) -> Result<User> {
        validate_new_user(input)?;

        let password_hash = self.hash_password(&input.password).await?;
        let new_user = NewUser {
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash,
        };

        match self.store.insert_user(&new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "user created");
                Ok(user)
            }
            Err(e) => Err(creation_error(&input.username, e)),
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let credentials = Arc::clone(&self.credentials);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || credentials.hash_password(&password))
            .await
            .map_err(hashing_failed)?
            .map_err(hashing_failed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.store.get_user_by_username(username).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.store.get_user_by_email(email).await?)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.store.get_user(id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Return the user if `password` matches, otherwise `None`.
    ///
    /// An unknown username and a wrong password are indistinguishable: both
    /// return `None` after one bcrypt verification.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self.store.get_user_by_username(username).await?;

        let credentials = Arc::clone(&self.credentials);
        let password = password.to_string();
        let outcome = tokio::task::spawn_blocking(move || {
            let verified = match &user {
                Some(user) => credentials.verify_password(&password, &user.password_hash),
                None => credentials.verify_placeholder(&password),
            };
            (user, verified)
        })
        .await;

        match outcome {
            Ok((Some(user), true)) => {
                tracing::debug!(user_id = %user.id, "authenticated");
                Ok(Some(user))
            }
            Ok(_) => {
                tracing::warn!(username = %username, "authentication rejected");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                Ok(None)
            }
        }
    }

    /// Authenticate and issue an access token whose subject is the username.
    pub async fn login(&self, input: &LoginInput) -> Result<Option<AccessToken>> {
        validate_login(input)?;

        let Some(user) = self.authenticate(&input.username, &input.password).await? else {
            return Ok(None);
        };
        let token = self.credentials.issue_access_token(&user.username)?;
        tracing::info!(user_id = %user.id, "access token issued");
        Ok(Some(AccessToken::bearer(token)))
    }

    /// Resolve a token to the user it was issued for.
    ///
    /// Fails with [`AuthError::InvalidToken`] if the token does not verify
    /// or its subject no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<User> {
        let username = self.credentials.verify_token(token)?;
        self.store
            .get_user_by_username(&username)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "token subject has no account");
                TallyError::Auth(AuthError::InvalidToken("unknown subject".into()))
            })
    }
}

fn creation_error(username: &str, e: StoreError) -> TallyError {
    match e.unique_column() {
        Some("username") => {
            tracing::warn!(username = %username, "username already taken");
            TallyError::UsernameTaken
        }
        Some("email") => {
            tracing::warn!(username = %username, "email already taken");
            TallyError::EmailTaken
        }
        _ => {
            tracing::error!(username = %username, error = %e, "user creation failed");
            TallyError::UserCreationFailed("User creation failed".into())
        }
    }
}

fn hashing_failed(e: impl fmt::Display) -> TallyError {
    tracing::error!(error = %e, "password hashing failed");
    TallyError::UserCreationFailed("User creation failed".into())
}
