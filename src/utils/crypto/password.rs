//! Password hashing and verification using Argon2

use crate::utils::error::{GateError, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::LazyLock;
use tracing::warn;

/// Digest checked when there is no stored one, so that a missing account
/// costs the same Argon2 work as a wrong password
static DUMMY_DIGEST: LazyLock<String> = LazyLock::new(|| {
    hash_password("rbac-gate-placeholder-credential").unwrap_or_default()
});

#[cfg(test)]
thread_local! {
    static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of Argon2 verifications run on the current thread
#[cfg(test)]
pub(crate) fn verification_count() -> usize {
    VERIFICATIONS.with(|count| count.get())
}

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| GateError::Crypto(format!("Failed to hash password: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verify a password against its stored digest.
///
/// A digest that cannot be parsed counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password digest is malformed: {}", e);
            return false;
        }
    };

    #[cfg(test)]
    VERIFICATIONS.with(|count| count.set(count.get() + 1));

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            warn!("Password verification failed: {}", e);
            false
        }
    }
}

/// Run a verification that always fails, for lookups that found no account
pub fn verify_dummy_password(password: &str) -> bool {
    verify_password(password, &DUMMY_DIGEST);
    false
}
