//! Authentication types for the domain layer.
//!
//! These types represent a caller decoded from a bearer token. They have
//! **no external dependencies**: any token scheme can populate them via the
//! `TokenValidator` port.

use super::{Role, Username};
use thiserror::Error;

/// Caller identity extracted from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account the token was issued to.
    pub username: Username,

    /// Role tag the token was issued with.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(username: Username, role: Role) -> Self {
        Self { username, role }
    }

    /// Returns true if the caller holds one of the allowed roles.
    pub fn has_role(&self, allowed: &[Role]) -> bool {
        self.role.is_one_of(allowed)
    }
}

/// Authentication errors that can occur during token handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The username or password did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The caller's role is not permitted for this operation.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Signing or hashing failed on our side.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the caller should log in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
