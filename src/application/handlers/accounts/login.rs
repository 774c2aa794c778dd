//! LoginHandler - exchanges a password for a bearer token.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, DomainError, Role, Timestamp, Username};
use crate::ports::{AccountRepository, PasswordHasher, TokenIssuer};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: Username,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub role: Role,
    pub expires_at: Timestamp,
}

pub struct LoginHandler {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            issuer,
        }
    }

    /// # Errors
    ///
    /// - `Unauthorized` for an unknown username or a wrong password, with
    ///   the same message for both
    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, DomainError> {
        let Some(account) = self.accounts.find_account(&cmd.username).await? else {
            tracing::info!(username = %cmd.username, "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        };
        if !self
            .hasher
            .verify(cmd.password.expose_secret(), account.password_hash())?
        {
            tracing::info!(username = %cmd.username, "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        let issued = self.issuer.issue(account.username(), account.role()).await?;
        tracing::info!(username = %account.username(), role = %account.role(), "Login succeeded");
        Ok(LoginResult {
            token: issued.token,
            role: account.role(),
            expires_at: issued.expires_at,
        })
    }
}
