//! BootstrapAdminHandler - seeds the administrator account at startup.

use std::sync::Arc;

use secrecy::SecretString;

use super::hash_password;
use crate::domain::directory::Account;
use crate::domain::foundation::{DomainError, Role, Username};
use crate::ports::{AccountRepository, PasswordHasher};

pub struct BootstrapAdminHandler {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl BootstrapAdminHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Creates the admin account if it does not exist yet.
    ///
    /// Returns `true` if an account was created.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the name is held by a non-admin account
    /// - `ValidationFailed` for a bad password
    pub async fn handle(
        &self,
        username: Username,
        password: &SecretString,
    ) -> Result<bool, DomainError> {
        if let Some(existing) = self.accounts.find_account(&username).await? {
            if existing.role() != Role::Admin {
                return Err(DomainError::conflict(format!(
                    "Bootstrap admin '{}' exists as a {} account",
                    username,
                    existing.role()
                )));
            }
            tracing::debug!(username = %username, "Admin account already present");
            return Ok(false);
        }

        let hash = hash_password(self.hasher.as_ref(), password)?;
        self.accounts
            .save_account(&Account::new(username.clone(), hash, Role::Admin))
            .await?;
        tracing::info!(username = %username, "Admin account created");
        Ok(true)
    }
}
