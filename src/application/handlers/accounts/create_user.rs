//! CreateUserHandler - managers create user accounts.

use std::sync::Arc;

use secrecy::SecretString;

use super::hash_password;
use crate::domain::directory::Account;
use crate::domain::foundation::{CommandMetadata, DomainError, Role, Username};
use crate::ports::{AccountRepository, PasswordHasher};

#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: Username,
    pub password: SecretString,
}

pub struct CreateUserHandler {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// # Errors
    ///
    /// - `ValidationFailed` for a bad password
    /// - `Conflict` if the username is taken
    pub async fn handle(
        &self,
        cmd: CreateUserCommand,
        metadata: CommandMetadata,
    ) -> Result<Account, DomainError> {
        let hash = hash_password(self.hasher.as_ref(), &cmd.password)?;
        let account = Account::new(cmd.username, hash, Role::User);
        self.accounts.save_account(&account).await?;

        tracing::info!(
            username = %account.username(),
            created_by = %metadata.actor,
            "User created"
        );
        Ok(account)
    }
}
