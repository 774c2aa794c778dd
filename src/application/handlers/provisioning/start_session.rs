//! StartSessionHandler - opens a provisioning session for a group member.

use std::sync::Arc;

use crate::domain::catalog::CloudProvider;
use crate::domain::foundation::{CommandMetadata, DomainError};
use crate::domain::provisioning::ProvisioningSession;
use crate::ports::{GroupRepository, SessionRepository};

/// Command to open a session against one provider.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub provider: CloudProvider,
}

/// Handler for opening sessions.
pub struct StartSessionHandler {
    groups: Arc<dyn GroupRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl StartSessionHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { groups, sessions }
    }

    /// Opens a session charged to the caller's group.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the caller belongs to no group
    pub async fn handle(
        &self,
        cmd: StartSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<ProvisioningSession, DomainError> {
        let group_id = self
            .groups
            .find_group_of(&metadata.actor)
            .await?
            .ok_or_else(|| DomainError::not_found("Group membership", &metadata.actor))?;

        let session = ProvisioningSession::open(metadata.actor.clone(), group_id, cmd.provider);
        self.sessions.save(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            group_id = %group_id,
            username = %metadata.actor,
            provider = %cmd.provider,
            "Provisioning session opened"
        );
        Ok(session)
    }
}
