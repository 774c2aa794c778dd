//! RemoveMemberHandler - takes a user out of a group.

use std::sync::Arc;

use super::load_owned_group;
use crate::domain::foundation::{CommandMetadata, DomainError, GroupId, Username};
use crate::ports::GroupRepository;

#[derive(Debug, Clone)]
pub struct RemoveMemberCommand {
    pub group_id: GroupId,
    pub username: Username,
}

pub struct RemoveMemberHandler {
    groups: Arc<dyn GroupRepository>,
}

impl RemoveMemberHandler {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    /// # Errors
    ///
    /// - `NotFound` if the group is unknown or the user is not a member
    /// - `Forbidden` if the caller does not own the group
    pub async fn handle(
        &self,
        cmd: RemoveMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        load_owned_group(self.groups.as_ref(), &cmd.group_id, &metadata.actor).await?;
        self.groups
            .remove_member(&cmd.group_id, &cmd.username)
            .await?;

        tracing::info!(
            group_id = %cmd.group_id,
            username = %cmd.username,
            manager = %metadata.actor,
            "Member removed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_manager, username, World, MANAGER, MEMBER};
    use crate::domain::foundation::{ErrorCode, Money};

    #[tokio::test]
    async fn removed_member_can_join_elsewhere() {
        let world = World::with_budget(Money::from_dollars(5)).await;
        let handler = RemoveMemberHandler::new(world.store.clone());

        handler
            .handle(
                RemoveMemberCommand {
                    group_id: world.group_id,
                    username: username(MEMBER),
                },
                as_manager(MANAGER),
            )
            .await
            .unwrap();

        assert!(world
            .store
            .find_group_of(&username(MEMBER))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn non_member_is_not_found() {
        let world = World::with_budget(Money::from_dollars(5)).await;

        let err = RemoveMemberHandler::new(world.store.clone())
            .handle(
                RemoveMemberCommand {
                    group_id: world.group_id,
                    username: username("bob"),
                },
                as_manager(MANAGER),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
