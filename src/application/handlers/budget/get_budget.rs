//! GetBudgetHandler - the budget read model.
//!
//! Readable by the owning manager and by members of the group.

use std::sync::Arc;

use crate::domain::budget::BudgetUsage;
use crate::domain::foundation::{CommandMetadata, DomainError, GroupId};
use crate::ports::{BudgetRepository, GroupRepository};

pub struct GetBudgetHandler {
    groups: Arc<dyn GroupRepository>,
    budgets: Arc<dyn BudgetRepository>,
}

impl GetBudgetHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, budgets: Arc<dyn BudgetRepository>) -> Self {
        Self { groups, budgets }
    }

    /// # Errors
    ///
    /// - `NotFound` if the group or its budget does not exist
    /// - `Forbidden` if the caller neither owns nor belongs to the group
    pub async fn handle(
        &self,
        group_id: GroupId,
        metadata: CommandMetadata,
    ) -> Result<BudgetUsage, DomainError> {
        let group = self
            .groups
            .find_by_id(&group_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", group_id))?;
        if !group.is_owned_by(&metadata.actor) && !group.is_member(&metadata.actor) {
            return Err(DomainError::forbidden(format!(
                "'{}' cannot view the budget of group {}",
                metadata.actor, group_id
            )));
        }

        self.budgets
            .find(&group_id)
            .await?
            .map(|b| b.usage())
            .ok_or_else(|| DomainError::not_found("Budget", group_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_manager, as_user, World, MANAGER, MEMBER};
    use crate::domain::foundation::{ErrorCode, Money};

    #[tokio::test]
    async fn manager_and_member_can_read() {
        let world = World::with_budget(Money::from_dollars(70)).await;
        let handler = GetBudgetHandler::new(world.store.clone(), world.store.clone());

        let usage = handler
            .handle(world.group_id, as_manager(MANAGER))
            .await
            .unwrap();
        assert_eq!(usage.total, Money::from_dollars(70));

        assert!(handler.handle(world.group_id, as_user(MEMBER)).await.is_ok());
    }

    #[tokio::test]
    async fn outsider_is_forbidden() {
        let world = World::with_budget(Money::from_dollars(70)).await;

        let err = GetBudgetHandler::new(world.store.clone(), world.store.clone())
            .handle(world.group_id, as_user("bob"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
