//! ProvisionSessionHandler - dispatch then finalize, in process.
//!
//! A dispatch failure or timeout leaves the session `Authorized` so it can
//! be retried. If finalize fails after the resource exists, the resource
//! is torn down again on a best-effort basis.

use std::sync::Arc;
use std::time::Duration;

use super::{
    load_owned_session, FinalizeSessionCommand, FinalizeSessionHandler, FinalizeSessionResult,
};
use crate::application::services::ProvisioningDispatcher;
use crate::domain::foundation::{CommandMetadata, DomainError, SessionId};
use crate::ports::SessionRepository;

#[derive(Debug, Clone)]
pub struct ProvisionSessionCommand {
    pub session_id: SessionId,
    /// Bound on the create call; the dispatcher default when absent.
    pub timeout: Option<Duration>,
}

/// Handler that creates the resource and commits it.
pub struct ProvisionSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    dispatcher: Arc<ProvisioningDispatcher>,
    finalize: Arc<FinalizeSessionHandler>,
}

impl ProvisionSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        dispatcher: Arc<ProvisioningDispatcher>,
        finalize: Arc<FinalizeSessionHandler>,
    ) -> Self {
        Self {
            sessions,
            dispatcher,
            finalize,
        }
    }

    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `Forbidden` if the caller does not own the session
    /// - `InvalidStateTransition` unless the session is `Authorized`
    /// - `UpstreamFailure` if the provisioner fails or times out
    /// - any finalize error, after the created resource was rolled back
    pub async fn handle(
        &self,
        cmd: ProvisionSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<FinalizeSessionResult, DomainError> {
        let session =
            load_owned_session(self.sessions.as_ref(), &cmd.session_id, &metadata.actor).await?;
        session.ensure_authorized()?;
        let (kind, config) = match (session.kind(), session.config()) {
            (Some(kind), Some(config)) => (kind, config.clone()),
            _ => {
                return Err(DomainError::internal(
                    "Authorized session has no configuration",
                ))
            }
        };

        let timeout = cmd.timeout.unwrap_or_else(|| self.dispatcher.timeout());
        let resource_id = self
            .dispatcher
            .create_within(kind, &config, timeout)
            .await?;

        let finalized = self
            .finalize
            .handle(
                FinalizeSessionCommand {
                    session_id: cmd.session_id,
                    provider_resource_id: resource_id.clone(),
                    final_config: None,
                },
                metadata,
            )
            .await;

        if let Err(e) = &finalized {
            tracing::warn!(
                session_id = %cmd.session_id,
                resource_id = %resource_id,
                error = %e,
                "Finalize failed after create, deleting resource"
            );
            if let Err(cleanup) = self.dispatcher.delete(kind, &resource_id).await {
                tracing::error!(
                    session_id = %cmd.session_id,
                    kind = %kind,
                    resource_id = %resource_id,
                    error = %cleanup,
                    "Orphaned cloud resource"
                );
            }
        }
        finalized
    }
}
