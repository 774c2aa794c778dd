//! Bearer token ports.
//!
//! The authenticator issues tokens carrying `(username, role, expiry)` at
//! login and validates them on every request. Keeping both behind ports
//! lets the HTTP middleware stay unaware of the token format.

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, Timestamp, Username};
use async_trait::async_trait;

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Port for issuing bearer tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for an authenticated account.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if signing fails
    async fn issue(&self, username: &Username, role: Role) -> Result<IssuedToken, AuthError>;
}

/// Port for validating bearer tokens.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate a token and return the caller it identifies.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` if the token is malformed or has a bad signature
    /// - `TokenExpired` if the token has expired
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Port for password hashing.
///
/// Hashing is CPU-bound, so this port is synchronous.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a self-describing string.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if hashing fails
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a password against a stored hash.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the stored hash is malformed
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ports_are_object_safe() {
        fn _issuer(_i: &dyn TokenIssuer) {}
        fn _validator(_v: &dyn TokenValidator) {}
        fn _hasher(_h: &dyn PasswordHasher) {}
    }
}
