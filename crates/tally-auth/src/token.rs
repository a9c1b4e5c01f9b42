//! Signed, time-limited access tokens.
//!
//! Tokens are HMAC-signed JWTs. Every token carries `exp` (and `iat`) in
//! seconds since the Unix epoch; the subject travels in `sub`.

use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthError, Result};

/// Lifetime used when a caller issues a token without naming one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Algorithms accepted for symmetric signing.
const ALLOWED_ALGORITHMS: &[Algorithm] = &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// The claim set of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, normally a username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Any further caller-supplied claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signs and verifies tokens with one secret and algorithm.
#[derive(Clone)]
pub struct TokenSigner {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    /// Create a signer from a secret and an algorithm name such as `HS256`.
    pub fn new(secret: &str, algorithm: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::Config("secret key must not be empty".into()));
        }
        let algorithm = Algorithm::from_str(algorithm)
            .ok()
            .filter(|alg| ALLOWED_ALGORITHMS.contains(alg))
            .ok_or_else(|| AuthError::UnsupportedAlgorithm(algorithm.to_string()))?;

        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// The signing algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issue a token carrying `claims` plus `exp = now + ttl` and `iat = now`.
    ///
    /// Any `exp` or `iat` already present in `claims` is replaced.
    pub fn issue(&self, claims: &Map<String, Value>, ttl: Duration) -> Result<String> {
        let now = now_secs();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        let mut extra = claims.clone();
        extra.remove("exp");
        extra.remove("iat");
        let sub = match extra.remove("sub") {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                extra.insert("sub".into(), other);
                None
            }
            None => None,
        };

        self.sign(&Claims {
            sub,
            exp: now.saturating_add(ttl),
            iat: Some(now),
            extra,
        })
    }

    /// Sign a fully specified claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired".to_string(),
                    ErrorKind::InvalidSignature => "signature mismatch".to_string(),
                    _ => e.to_string(),
                };
                AuthError::InvalidToken(reason)
            })
    }

    /// Verify a token and return its subject.
    ///
    /// A token without a non-empty string `sub` is invalid.
    pub fn verify(&self, token: &str) -> Result<String> {
        match self.decode(token)?.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(AuthError::InvalidToken("missing subject".into())),
        }
    }
}

/// Current time in seconds since the Unix epoch.
pub(crate) fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
