//! SelectServiceHandler - chooses the service a session will provision.

use std::sync::Arc;

use super::load_owned_session;
use crate::domain::catalog::ServiceConfig;
use crate::domain::foundation::{CommandMetadata, DomainError, SessionId};
use crate::domain::provisioning::ProvisioningSession;
use crate::ports::SessionRepository;

/// Command to select (or reselect) the session's service.
#[derive(Debug, Clone)]
pub struct SelectServiceCommand {
    pub session_id: SessionId,
    pub config: ServiceConfig,
}

/// Handler for service selection.
pub struct SelectServiceHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl SelectServiceHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// # Errors
    ///
    /// - `NotFound` if the session is missing or already past `Configured`
    /// - `Forbidden` if the caller does not own the session
    /// - `ValidationFailed` if the config is invalid or not offered by the
    ///   session's provider
    /// - `Conflict` if the session moved concurrently
    pub async fn handle(
        &self,
        cmd: SelectServiceCommand,
        metadata: CommandMetadata,
    ) -> Result<ProvisioningSession, DomainError> {
        let mut session =
            load_owned_session(self.sessions.as_ref(), &cmd.session_id, &metadata.actor).await?;
        let expected = session.state();

        session.select_service(cmd.config)?;
        self.sessions.update(&session, expected).await?;

        tracing::info!(
            session_id = %session.id(),
            username = %metadata.actor,
            service_type = ?session.service_type(),
            "Service selected"
        );
        Ok(session)
    }
}
