//! Argon2id password hashing and verification.
//!
//! Hashes use the PHC string format so algorithm parameters and the random
//! salt travel with the hash itself; the work factor is tunable by swapping
//! the Argon2 parameters without touching stored rows. Hashing is CPU-bound
//! and runs per request with no shared state, so concurrent logins never
//! serialize on it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AuthError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal("password hash", e))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// `Ok(false)` means the password did not match; other hash-parsing problems
/// are infrastructure failures, not a caller mistake.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::internal("password hash parse", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::internal("password verify", e)),
    }
}

/// Reject passwords below the minimum length before any hashing work.
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("real-password").unwrap();
        assert!(!verify_password("other-password", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash.
        let a = hash_password("repeatable").unwrap();
        let b = hash_password("repeatable").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn short_passwords_rejected() {
        assert_matches!(validate_password_strength("short"), Err(AuthError::Validation(_)));
        assert!(validate_password_strength("eight-ch").is_ok());
    }
}
