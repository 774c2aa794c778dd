//! DeleteUserHandler - managers remove user accounts.
//!
//! Membership goes with the account. Service records keep the username
//! as history.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError, Role, Username};
use crate::ports::AccountRepository;

pub struct DeleteUserHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl DeleteUserHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// # Errors
    ///
    /// - `NotFound` if no such account exists
    /// - `Forbidden` if the account is not a `user` account
    pub async fn handle(
        &self,
        username: Username,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        let account = self
            .accounts
            .find_account(&username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &username))?;
        if account.role() != Role::User {
            return Err(DomainError::forbidden(format!(
                "Account '{}' is a {} account, only user accounts can be deleted here",
                username,
                account.role()
            )));
        }

        self.accounts.delete_account(&username).await?;
        tracing::info!(username = %username, deleted_by = %metadata.actor, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_manager, username, World, MANAGER, MEMBER};
    use crate::domain::foundation::{ErrorCode, Money};
    use crate::ports::GroupRepository;

    #[tokio::test]
    async fn deleting_member_frees_membership() {
        let world = World::with_budget(Money::from_dollars(1)).await;

        DeleteUserHandler::new(world.store.clone())
            .handle(username(MEMBER), as_manager(MANAGER))
            .await
            .unwrap();

        assert!(world
            .store
            .find_group_of(&username(MEMBER))
            .await
            .unwrap()
            .is_none());
        let group = GroupRepository::find_by_id(world.store.as_ref(), &world.group_id)
            .await
            .unwrap()
            .unwrap();
        assert!(group.members().is_empty());
    }

    #[tokio::test]
    async fn manager_accounts_are_protected() {
        let world = World::with_budget(Money::from_dollars(1)).await;

        let err = DeleteUserHandler::new(world.store.clone())
            .handle(username(MANAGER), as_manager(MANAGER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let world = World::with_budget(Money::from_dollars(1)).await;

        let err = DeleteUserHandler::new(world.store.clone())
            .handle(username("ghost"), as_manager(MANAGER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
