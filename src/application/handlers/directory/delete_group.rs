//! DeleteGroupHandler - removes an empty group with no live services.

use std::sync::Arc;

use super::load_owned_group;
use crate::domain::foundation::{CommandMetadata, DomainError, GroupId};
use crate::domain::registry::ServiceStatus;
use crate::ports::{GroupRepository, ServiceFilter, ServiceRecordRepository};

pub struct DeleteGroupHandler {
    groups: Arc<dyn GroupRepository>,
    records: Arc<dyn ServiceRecordRepository>,
}

impl DeleteGroupHandler {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        records: Arc<dyn ServiceRecordRepository>,
    ) -> Self {
        Self { groups, records }
    }

    /// Deletes the group and its budget.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the group does not exist
    /// - `Forbidden` if the caller does not own it
    /// - `Conflict` if it still has members or live services
    pub async fn handle(
        &self,
        group_id: GroupId,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        let group = load_owned_group(self.groups.as_ref(), &group_id, &metadata.actor).await?;

        let live = self
            .records
            .list(
                &ServiceFilter::for_group(group_id)
                    .with_statuses(&[ServiceStatus::Active, ServiceStatus::Deleting]),
            )
            .await?;
        if !live.is_empty() {
            return Err(DomainError::conflict(format!(
                "Group '{}' still has {} live service(s)",
                group.name(),
                live.len()
            )));
        }

        self.groups.delete(&group_id).await?;
        tracing::info!(group_id = %group_id, manager = %metadata.actor, "Group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_manager, username, World, MANAGER, MEMBER};
    use crate::domain::foundation::{ErrorCode, Money};
    use crate::ports::BudgetRepository;

    #[tokio::test]
    async fn group_with_members_conflicts() {
        let world = World::with_budget(Money::from_dollars(5)).await;

        let err = DeleteGroupHandler::new(world.store.clone(), world.store.clone())
            .handle(world.group_id, as_manager(MANAGER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn empty_group_is_deleted_with_budget() {
        let world = World::with_budget(Money::from_dollars(5)).await;
        world
            .store
            .remove_member(&world.group_id, &username(MEMBER))
            .await
            .unwrap();

        DeleteGroupHandler::new(world.store.clone(), world.store.clone())
            .handle(world.group_id, as_manager(MANAGER))
            .await
            .unwrap();

        assert!(world.store.find(&world.group_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn other_manager_is_forbidden() {
        let world = World::with_budget(Money::from_dollars(5)).await;

        let err = DeleteGroupHandler::new(world.store.clone(), world.store.clone())
            .handle(world.group_id, as_manager("rival"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
