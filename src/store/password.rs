//! Password hashing and verification for the credential store.
//!
//! Stored secrets are Argon2id PHC-format strings (e.g.
//! `$argon2id$v=19$m=19456,t=2,p=1$...`); the plaintext never touches the
//! store file. Verification parses the stored string and checks the supplied
//! password against it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::warn;

/// Hash a password with a fresh random salt. Returns a PHC-format string.
///
/// # Errors
/// Returns an error if the underlying hasher fails.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC-format hash.
///
/// A malformed stored hash rejects the credentials rather than erroring out;
/// the login path must never distinguish failure causes to the caller.
#[must_use]
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        warn!("stored password hash is malformed; rejecting credentials");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
