//! HS256 JWT authenticator.
//!
//! Issues bearer tokens at login and validates them on every request.
//! Tokens carry the username as `sub` and the role as a private claim.
//!
//! # Security
//!
//! - Issuer and expiry are always validated
//! - `sub`, `exp`, `iat` and `iss` are required claims
//! - The signing secret never leaves this adapter

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, Timestamp, Username};
use crate::ports::{IssuedToken, TokenIssuer, TokenValidator};

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Token issuer and validator backed by a shared HMAC secret.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: u64,
}

impl JwtAuthenticator {
    pub fn new(secret: &SecretString, issuer: impl Into<String>, ttl_secs: u64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            issuer: issuer.into(),
            ttl_secs,
        }
    }

    fn sign(
        &self,
        username: &Username,
        role: Role,
        issued_at: Timestamp,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at.plus_secs(self.ttl_secs as i64);
        let claims = Claims {
            sub: username.to_string(),
            role,
            iss: self.issuer.clone(),
            iat: issued_at.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign token: {}", e);
                AuthError::service_unavailable("token signing failed")
            })?;
        Ok(IssuedToken { token, expires_at })
    }
}

#[async_trait]
impl TokenIssuer for JwtAuthenticator {
    async fn issue(&self, username: &Username, role: Role) -> Result<IssuedToken, AuthError> {
        self.sign(username, role, Timestamp::now())
    }
}

#[async_trait]
impl TokenValidator for JwtAuthenticator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::warn!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;

        let username = Username::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(username, data.claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new(
            &SecretString::new("test-secret-with-enough-entropy".to_string()),
            "cloud-steward",
            3600,
        )
    }

    #[tokio::test]
    async fn issued_token_validates_to_same_user() {
        let auth = authenticator();
        let alice = Username::new("alice").unwrap();

        let issued = auth.issue(&alice, Role::Manager).await.unwrap();
        let user = auth.validate(&issued.token).await.unwrap();

        assert_eq!(user.username, alice);
        assert_eq!(user.role, Role::Manager);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_as_expired() {
        let auth = authenticator();
        let alice = Username::new("alice").unwrap();
        let long_ago = Timestamp::now().plus_secs(-2 * 3600);

        let issued = auth.sign(&alice, Role::User, long_ago).unwrap();
        let err = auth.validate(&issued.token).await.unwrap_err();

        assert_eq!(err, AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn token_from_other_secret_is_invalid() {
        let other = JwtAuthenticator::new(
            &SecretString::new("a-different-secret".to_string()),
            "cloud-steward",
            3600,
        );
        let issued = other
            .issue(&Username::new("mallory").unwrap(), Role::Admin)
            .await
            .unwrap();

        let err = authenticator().validate(&issued.token).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn token_from_other_issuer_is_invalid() {
        let other = JwtAuthenticator::new(
            &SecretString::new("test-secret-with-enough-entropy".to_string()),
            "someone-else",
            3600,
        );
        let issued = other
            .issue(&Username::new("alice").unwrap(), Role::User)
            .await
            .unwrap();

        let err = authenticator().validate(&issued.token).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let err = authenticator().validate("not.a.jwt").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }
}
