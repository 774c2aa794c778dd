//! CreateGroupHandler - managers create groups within their quota.

use std::sync::Arc;

use crate::domain::directory::Group;
use crate::domain::foundation::{CommandMetadata, DomainError};
use crate::ports::{AccountRepository, GroupRepository};

#[derive(Debug, Clone)]
pub struct CreateGroupCommand {
    pub name: String,
}

pub struct CreateGroupHandler {
    accounts: Arc<dyn AccountRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl CreateGroupHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { accounts, groups }
    }

    /// Creates a group owned by the calling manager.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the caller is not a known manager
    /// - `ValidationFailed` for a blank or oversized name
    /// - `Conflict` if the manager already has a group with this name
    /// - `QuotaExceeded` if the manager is at their group limit
    pub async fn handle(
        &self,
        cmd: CreateGroupCommand,
        metadata: CommandMetadata,
    ) -> Result<Group, DomainError> {
        let manager = self
            .accounts
            .find_manager(&metadata.actor)
            .await?
            .ok_or_else(|| DomainError::not_found("Manager", &metadata.actor))?;

        let group = Group::new(manager.username().clone(), &cmd.name)?;
        self.groups.create(&group, manager.group_limit()).await?;

        tracing::info!(
            group_id = %group.id(),
            manager = %manager.username(),
            name = group.name(),
            "Group created"
        );
        Ok(group)
    }
}
