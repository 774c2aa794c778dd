//! CreateManagerHandler - administrators create manager accounts.

use std::sync::Arc;

use secrecy::SecretString;

use super::hash_password;
use crate::domain::directory::{Account, Manager};
use crate::domain::foundation::{CommandMetadata, DomainError, Role, Username};
use crate::ports::{AccountRepository, PasswordHasher};

#[derive(Debug, Clone)]
pub struct CreateManagerCommand {
    pub username: Username,
    pub password: SecretString,
    pub group_limit: u32,
}

pub struct CreateManagerHandler {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateManagerHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Creates the manager and its `manager`-tagged login.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for a bad password or group limit
    /// - `Conflict` if the username is taken
    pub async fn handle(
        &self,
        cmd: CreateManagerCommand,
        metadata: CommandMetadata,
    ) -> Result<Manager, DomainError> {
        let manager = Manager::new(cmd.username.clone(), cmd.group_limit)?;
        let hash = hash_password(self.hasher.as_ref(), &cmd.password)?;
        let account = Account::new(cmd.username, hash, Role::Manager);

        self.accounts.save_manager(&manager, &account).await?;

        tracing::info!(
            username = %manager.username(),
            group_limit = manager.group_limit(),
            created_by = %metadata.actor,
            "Manager created"
        );
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{as_admin, username, PlainHasher};
    use crate::domain::foundation::ErrorCode;

    fn command(name: &str, limit: u32) -> CreateManagerCommand {
        CreateManagerCommand {
            username: username(name),
            password: SecretString::new("manager-pass".to_string()),
            group_limit: limit,
        }
    }

    #[tokio::test]
    async fn creates_manager_with_manager_login() {
        let store = Arc::new(InMemoryStore::new());
        let handler = CreateManagerHandler::new(store.clone(), Arc::new(PlainHasher));

        handler.handle(command("morgan", 2), as_admin()).await.unwrap();

        let account = store.find_account(&username("morgan")).await.unwrap().unwrap();
        assert_eq!(account.role(), Role::Manager);
        let manager = store.find_manager(&username("morgan")).await.unwrap().unwrap();
        assert_eq!(manager.group_limit(), 2);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = Arc::new(InMemoryStore::new());
        let handler = CreateManagerHandler::new(store, Arc::new(PlainHasher));
        handler.handle(command("morgan", 2), as_admin()).await.unwrap();

        let err = handler
            .handle(command("morgan", 5), as_admin())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn zero_group_limit_is_invalid() {
        let store = Arc::new(InMemoryStore::new());
        let handler = CreateManagerHandler::new(store, Arc::new(PlainHasher));

        let err = handler
            .handle(command("morgan", 0), as_admin())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
