//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest signing secret accepted outside production.
const MIN_SECRET_BYTES: usize = 16;

/// Shortest signing secret accepted in production.
const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

const MIN_TOKEN_TTL_SECS: u64 = 60;
const MAX_TOKEN_TTL_SECS: u64 = 7 * 24 * 3600;

/// Bearer token and bootstrap account configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: SecretString,

    /// `iss` claim written into and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Administrator seeded at startup when absent
    pub bootstrap_admin_username: Option<String>,

    pub bootstrap_admin_password: Option<SecretString>,
}

/// Credentials for the seeded administrator.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: SecretString,
}

impl AuthConfig {
    /// A config signing with `secret`, other fields defaulted.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: SecretString::new(secret.into()),
            issuer: default_issuer(),
            token_ttl_secs: default_token_ttl(),
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
        }
    }

    /// The administrator to seed, if both halves are configured.
    pub fn bootstrap_admin(&self) -> Option<BootstrapAdmin> {
        match (&self.bootstrap_admin_username, &self.bootstrap_admin_password) {
            (Some(username), Some(password)) => Some(BootstrapAdmin {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Validate authentication configuration
    ///
    /// Production requires a longer signing secret.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len == 0 {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        let min = match environment {
            Environment::Production => MIN_PRODUCTION_SECRET_BYTES,
            _ => MIN_SECRET_BYTES,
        };
        if secret_len < min {
            return Err(ValidationError::JwtSecretTooShort(min));
        }
        if self.issuer.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if !(MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.bootstrap_admin_username.is_some() != self.bootstrap_admin_password.is_some() {
            return Err(ValidationError::IncompleteBootstrapAdmin);
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "cloud-steward".to_string()
}

fn default_token_ttl() -> u64 {
    3600
}
