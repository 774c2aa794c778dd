//! GetSessionHandler - reads a session for its owner.

use std::sync::Arc;

use super::load_owned_session;
use crate::domain::foundation::{CommandMetadata, DomainError, SessionId};
use crate::domain::provisioning::ProvisioningSession;
use crate::ports::SessionRepository;

pub struct GetSessionHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(
        &self,
        session_id: SessionId,
        metadata: CommandMetadata,
    ) -> Result<ProvisioningSession, DomainError> {
        load_owned_session(self.sessions.as_ref(), &session_id, &metadata.actor).await
    }
}
