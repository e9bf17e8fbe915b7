//! Password hashing and verification
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$digest`),
//! so the salt and cost parameters travel with the digest and verification
//! needs nothing else from the row.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use thiserror::Error;

/// Errors raised while hashing or reading a stored hash
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(password_hash::Error),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
}

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    // Argon2id v19 with the crate's default cost parameters
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?
        .to_string();

    Ok(hash)
}

/// Check a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch. The digest comparison is constant-time.
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e)),
    }
}
