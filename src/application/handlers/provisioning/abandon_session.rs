//! AbandonSessionHandler - discards a denied session.

use std::sync::Arc;

use super::load_owned_session;
use crate::domain::foundation::{CommandMetadata, DomainError, SessionId};
use crate::domain::provisioning::SessionState;
use crate::ports::SessionRepository;

#[derive(Debug, Clone)]
pub struct AbandonSessionCommand {
    pub session_id: SessionId,
}

/// Handler for abandoning sessions. The budget is never touched.
pub struct AbandonSessionHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl AbandonSessionHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `Forbidden` if the caller does not own the session
    /// - `InvalidStateTransition` unless the session is `Denied`
    pub async fn handle(
        &self,
        cmd: AbandonSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        let mut session =
            load_owned_session(self.sessions.as_ref(), &cmd.session_id, &metadata.actor).await?;
        session.abandon()?;
        self.sessions
            .delete(session.id(), SessionState::Denied)
            .await?;

        tracing::info!(
            session_id = %session.id(),
            username = %metadata.actor,
            "Session abandoned"
        );
        Ok(())
    }
}
