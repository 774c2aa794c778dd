//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

use crate::domain::foundation::AuthError;
use crate::ports::PasswordHasher;

/// Hashes passwords into PHC strings with Argon2id default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::service_unavailable(format!("password hashing failed: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::service_unavailable(format!("invalid hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::service_unavailable(format!("verify error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(hasher.verify("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(!hasher.verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = Argon2PasswordHasher::new();
        assert_ne!(hasher.hash("hunter2").unwrap(), hasher.hash("hunter2").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = Argon2PasswordHasher::new()
            .verify("hunter2", "not-a-phc-string")
            .unwrap_err();
        assert!(matches!(err, AuthError::ServiceUnavailable(_)));
    }
}
