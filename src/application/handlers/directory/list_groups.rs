//! ListGroupsHandler - a manager's groups with their budgets.

use std::sync::Arc;

use crate::domain::budget::BudgetUsage;
use crate::domain::directory::Group;
use crate::domain::foundation::{CommandMetadata, DomainError};
use crate::ports::{BudgetRepository, GroupRepository};

/// A group and its budget, if one has been allocated.
#[derive(Debug, Clone)]
pub struct GroupView {
    pub group: Group,
    pub budget: Option<BudgetUsage>,
}

pub struct ListGroupsHandler {
    groups: Arc<dyn GroupRepository>,
    budgets: Arc<dyn BudgetRepository>,
}

impl ListGroupsHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, budgets: Arc<dyn BudgetRepository>) -> Self {
        Self { groups, budgets }
    }

    /// Lists the caller's groups, ordered by name.
    pub async fn handle(&self, metadata: CommandMetadata) -> Result<Vec<GroupView>, DomainError> {
        let groups = self.groups.list_by_manager(&metadata.actor).await?;
        let mut views = Vec::with_capacity(groups.len());
        for group in groups {
            let budget = self.budgets.find(group.id()).await?.map(|b| b.usage());
            views.push(GroupView { group, budget });
        }
        Ok(views)
    }
}
