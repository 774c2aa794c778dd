//! FinalizeSessionHandler - commits a provisioned resource.
//!
//! The existence check, debit, record insert and session delete run as
//! one unit inside the [`FinalizeCommitter`]. Notifications follow the
//! commit and never undo it.

use std::sync::Arc;

use super::load_owned_session;
use crate::application::services::Notifier;
use crate::domain::budget::{BudgetAlertPolicy, BudgetUsage};
use crate::domain::catalog::ServiceConfig;
use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, SessionId};
use crate::domain::notification::NotificationCategory;
use crate::domain::registry::ServiceRecord;
use crate::ports::{FinalizeCommit, FinalizeCommitter, ServiceRecordRepository, SessionRepository};

/// Command to commit the outcome of a dispatch.
#[derive(Debug, Clone)]
pub struct FinalizeSessionCommand {
    pub session_id: SessionId,
    pub provider_resource_id: String,
    /// Replaces the selected config when the provider reported more detail.
    pub final_config: Option<ServiceConfig>,
}

/// Result of a successful finalize.
#[derive(Debug, Clone)]
pub struct FinalizeSessionResult {
    pub record: ServiceRecord,
    pub usage: BudgetUsage,
}

/// Handler for finalizing sessions.
pub struct FinalizeSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    records: Arc<dyn ServiceRecordRepository>,
    committer: Arc<dyn FinalizeCommitter>,
    notifier: Notifier,
    alert_policy: BudgetAlertPolicy,
}

impl FinalizeSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        records: Arc<dyn ServiceRecordRepository>,
        committer: Arc<dyn FinalizeCommitter>,
        notifier: Notifier,
        alert_policy: BudgetAlertPolicy,
    ) -> Self {
        Self {
            sessions,
            records,
            committer,
            notifier,
            alert_policy,
        }
    }

    /// # Errors
    ///
    /// - `Conflict` if the session was already finalized
    /// - `NotFound` if the session never existed
    /// - `Forbidden` if the caller does not own the session
    /// - `InvalidStateTransition` unless the session is `Authorized`
    /// - `InsufficientBudget` if the debit no longer fits
    /// - `ValidationFailed` for a blank resource id or mismatched config
    pub async fn handle(
        &self,
        cmd: FinalizeSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<FinalizeSessionResult, DomainError> {
        let loaded =
            match load_owned_session(self.sessions.as_ref(), &cmd.session_id, &metadata.actor)
                .await
            {
                Ok(session) => session,
                Err(e) if e.code == ErrorCode::NotFound => {
                    return Err(self.explain_missing(&cmd.session_id, e).await);
                }
                Err(e) => return Err(e),
            };

        let mut session = loaded.clone();
        let record = session.finalize(&cmd.provider_resource_id, cmd.final_config)?;
        let amount = record.cost();

        let usage = self
            .committer
            .commit(&FinalizeCommit {
                session: loaded,
                record: record.clone(),
                amount,
            })
            .await?;

        tracing::info!(
            session_id = %record.session_id(),
            group_id = %record.group_id(),
            username = %record.username(),
            kind = %record.kind(),
            resource_id = record.provider_resource_id(),
            cost = %amount,
            remaining = %usage.remaining,
            "Session finalized"
        );

        self.notifier
            .notify_group_manager(record.group_id(), NotificationCategory::ServiceCreated, |g| {
                format!(
                    "User '{}' provisioned {} resource '{}' in group '{}' at an estimated {}",
                    record.username(),
                    record.kind(),
                    record.provider_resource_id(),
                    g.name(),
                    amount
                )
            })
            .await;

        if self.alert_policy.crossed_by(&usage, amount) {
            let policy = self.alert_policy;
            self.notifier
                .notify_group_manager(record.group_id(), NotificationCategory::BudgetAlert, |g| {
                    policy.message(g.name(), &usage)
                })
                .await;
        }

        Ok(FinalizeSessionResult { record, usage })
    }

    /// A session is deleted by its own finalize, so a missing session with
    /// a record is a duplicate finalize rather than an unknown id.
    async fn explain_missing(&self, id: &SessionId, not_found: DomainError) -> DomainError {
        match self.records.find_by_session(id).await {
            Ok(Some(_)) => {
                DomainError::conflict(format!("Session {} has already been finalized", id))
            }
            Ok(None) => not_found,
            Err(e) => e,
        }
    }
}
