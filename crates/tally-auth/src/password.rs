//! Adaptive password hashing.
//!
//! Digests are bcrypt strings (`$2b$<cost>$<salt+hash>`), so the salt and
//! cost travel with the hash and verification needs nothing else.

use crate::error::{AuthError, Result};

/// Lowest cost factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Highest cost factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password with a fresh random salt.
///
/// Input longer than [`MAX_PASSWORD_BYTES`] is refused rather than
/// silently truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(AuthError::Hashing(format!(
            "cost {} outside {}..={}",
            cost, MIN_COST, MAX_COST
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::Hashing(format!(
            "password exceeds {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored digest.
///
/// A digest that cannot be parsed verifies as `false`, and so does a
/// candidate too long to have produced any digest from [`hash_password`].
pub fn verify_password(password: &str, hash: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    bcrypt::verify(password, hash).unwrap_or(false)
}
