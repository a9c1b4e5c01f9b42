//! # Tally Auth
//!
//! Credential primitives for Tally.
//!
//! ## Overview
//!
//! - **Passwords**: salted bcrypt digests with a tunable cost factor. Two
//!   hashes of the same password differ; both verify.
//! - **Tokens**: self-contained JWTs signed with a server-side secret,
//!   carrying caller claims plus `exp`/`iat`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tally_auth::{AuthConfig, CredentialService};
//!
//! let credentials = CredentialService::new(AuthConfig::with_random_secret()).unwrap();
//!
//! let hash = credentials.hash_password("Passw0rd!").unwrap();
//! assert!(credentials.verify_password("Passw0rd!", &hash));
//!
//! let token = credentials.issue_access_token("alice").unwrap();
//! assert_eq!(credentials.verify_token(&token).unwrap(), "alice");
//! ```
//!
//! ## Security Notes
//!
//! - Malformed hashes verify as `false`, never as an error.
//! - Expired, tampered, malformed or subject-less tokens all fail with
//!   [`AuthError::InvalidToken`].
//! - Secrets, hashes and tokens are never logged.

pub mod config;
pub mod credentials;
pub mod error;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use credentials::CredentialService;
pub use error::{AuthError, Result};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSigner, DEFAULT_TOKEN_TTL};
