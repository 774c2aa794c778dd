//! AllocateBudgetHandler - first-write-wins budget allocation.

use std::sync::Arc;

use crate::application::handlers::directory::load_owned_group;
use crate::domain::budget::{Budget, BudgetUsage};
use crate::domain::foundation::{CommandMetadata, DomainError, GroupId, Money};
use crate::ports::{BudgetRepository, GroupRepository};

#[derive(Debug, Clone)]
pub struct AllocateBudgetCommand {
    pub group_id: GroupId,
    pub total: Money,
}

pub struct AllocateBudgetHandler {
    groups: Arc<dyn GroupRepository>,
    budgets: Arc<dyn BudgetRepository>,
}

impl AllocateBudgetHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, budgets: Arc<dyn BudgetRepository>) -> Self {
        Self { groups, budgets }
    }

    /// # Errors
    ///
    /// - `NotFound` if the group does not exist
    /// - `Forbidden` if the caller does not own it
    /// - `Conflict` if a budget was already allocated
    pub async fn handle(
        &self,
        cmd: AllocateBudgetCommand,
        metadata: CommandMetadata,
    ) -> Result<BudgetUsage, DomainError> {
        load_owned_group(self.groups.as_ref(), &cmd.group_id, &metadata.actor).await?;

        let budget = Budget::allocate(cmd.group_id, cmd.total);
        self.budgets.allocate(&budget).await?;

        tracing::info!(
            group_id = %cmd.group_id,
            total = %cmd.total,
            manager = %metadata.actor,
            "Budget allocated"
        );
        Ok(budget.usage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_manager, username, World, MANAGER};
    use crate::domain::directory::Group;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn allocates_once() {
        let world = World::with_budget(Money::from_dollars(1)).await;
        let group = Group::new(username(MANAGER), "ops").unwrap();
        world.store.create(&group, 3).await.unwrap();
        let handler = AllocateBudgetHandler::new(world.store.clone(), world.store.clone());
        let allocate = AllocateBudgetCommand {
            group_id: *group.id(),
            total: Money::from_dollars(900),
        };

        let usage = handler
            .handle(allocate.clone(), as_manager(MANAGER))
            .await
            .unwrap();
        assert_eq!(usage.remaining, Money::from_dollars(900));

        let err = handler
            .handle(allocate, as_manager(MANAGER))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn other_managers_group_is_forbidden() {
        let world = World::with_budget(Money::from_dollars(1)).await;

        let err = AllocateBudgetHandler::new(world.store.clone(), world.store.clone())
            .handle(
                AllocateBudgetCommand {
                    group_id: world.group_id,
                    total: Money::from_dollars(5),
                },
                as_manager("rival"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
