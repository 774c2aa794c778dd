//! ReviseBudgetHandler - changes a group's total.

use std::sync::Arc;

use crate::application::handlers::directory::load_owned_group;
use crate::domain::budget::BudgetUsage;
use crate::domain::foundation::{CommandMetadata, DomainError, GroupId, Money};
use crate::ports::{BudgetRepository, GroupRepository};

#[derive(Debug, Clone)]
pub struct ReviseBudgetCommand {
    pub group_id: GroupId,
    pub total: Money,
}

pub struct ReviseBudgetHandler {
    groups: Arc<dyn GroupRepository>,
    budgets: Arc<dyn BudgetRepository>,
}

impl ReviseBudgetHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, budgets: Arc<dyn BudgetRepository>) -> Self {
        Self { groups, budgets }
    }

    /// # Errors
    ///
    /// - `NotFound` if the group or its budget does not exist
    /// - `Forbidden` if the caller does not own the group
    /// - `ValidationFailed` if the new total is below what is already used
    pub async fn handle(
        &self,
        cmd: ReviseBudgetCommand,
        metadata: CommandMetadata,
    ) -> Result<BudgetUsage, DomainError> {
        load_owned_group(self.groups.as_ref(), &cmd.group_id, &metadata.actor).await?;

        let budget = self.budgets.revise(&cmd.group_id, cmd.total).await?;

        tracing::info!(
            group_id = %cmd.group_id,
            total = %budget.total(),
            used = %budget.used(),
            manager = %metadata.actor,
            "Budget revised"
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

    fn revise(group_id: GroupId, dollars: u64) -> ReviseBudgetCommand {
        ReviseBudgetCommand {
            group_id,
            total: Money::from_dollars(dollars),
        }
    }

    #[tokio::test]
    async fn raises_total_and_keeps_usage() {
        let world = World::with_budget(Money::from_dollars(100)).await;
        world
            .store
            .debit(&world.group_id, Money::from_dollars(40))
            .await
            .unwrap();

        let usage = ReviseBudgetHandler::new(world.store.clone(), world.store.clone())
            .handle(revise(world.group_id, 300), as_manager(MANAGER))
            .await
            .unwrap();

        assert_eq!(usage.used, Money::from_dollars(40));
        assert_eq!(usage.remaining, Money::from_dollars(260));
    }

    #[tokio::test]
    async fn total_below_used_is_invalid() {
        let world = World::with_budget(Money::from_dollars(100)).await;
        world
            .store
            .debit(&world.group_id, Money::from_dollars(40))
            .await
            .unwrap();

        let err = ReviseBudgetHandler::new(world.store.clone(), world.store.clone())
            .handle(revise(world.group_id, 30), as_manager(MANAGER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn unallocated_group_is_not_found() {
        let world = World::with_budget(Money::from_dollars(100)).await;
        let group = Group::new(username(MANAGER), "ops").unwrap();
        world.store.create(&group, 3).await.unwrap();

        let err = ReviseBudgetHandler::new(world.store.clone(), world.store.clone())
            .handle(revise(*group.id(), 30), as_manager(MANAGER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
