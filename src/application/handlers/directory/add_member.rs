//! AddMemberHandler - places a user in one of the manager's groups.

use std::sync::Arc;

use super::load_owned_group;
use crate::domain::foundation::{CommandMetadata, DomainError, GroupId, Role, Username};
use crate::ports::{AccountRepository, GroupRepository};

#[derive(Debug, Clone)]
pub struct AddMemberCommand {
    pub group_id: GroupId,
    pub username: Username,
}

pub struct AddMemberHandler {
    accounts: Arc<dyn AccountRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl AddMemberHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { accounts, groups }
    }

    /// # Errors
    ///
    /// - `NotFound` if the group or the user account is unknown
    /// - `Forbidden` if the caller does not own the group
    /// - `ValidationFailed` if the account is not a `user` account
    /// - `Conflict` if the user already belongs to any group
    pub async fn handle(
        &self,
        cmd: AddMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        load_owned_group(self.groups.as_ref(), &cmd.group_id, &metadata.actor).await?;

        let account = self
            .accounts
            .find_account(&cmd.username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &cmd.username))?;
        if account.role() != Role::User {
            return Err(DomainError::validation(
                "username",
                format!(
                    "'{}' is a {} account, only users can join groups",
                    cmd.username,
                    account.role()
                ),
            ));
        }

        self.groups.add_member(&cmd.group_id, &cmd.username).await?;
        tracing::info!(
            group_id = %cmd.group_id,
            username = %cmd.username,
            manager = %metadata.actor,
            "Member added"
        );
        Ok(())
    }
}
