//! EvaluateCostHandler - the authorization gate.
//!
//! Compares the estimate against the group's remaining budget. The
//! comparison is advisory; the binding check is the atomic debit at
//! finalize.

use std::sync::Arc;

use super::load_owned_session;
use crate::application::services::{CostEstimator, Notifier};
use crate::domain::foundation::{CommandMetadata, DomainError, Money, SessionId};
use crate::domain::notification::NotificationCategory;
use crate::domain::provisioning::{ProvisioningSession, SessionState};
use crate::ports::{BudgetRepository, SessionRepository};

/// Command to estimate and gate a configured session.
#[derive(Debug, Clone)]
pub struct EvaluateCostCommand {
    pub session_id: SessionId,
}

/// Outcome of the authorization gate.
#[derive(Debug, Clone)]
pub struct EvaluateCostResult {
    pub session: ProvisioningSession,
    pub estimated_cost: Money,
    pub remaining: Money,
    pub unestimable: bool,
}

impl EvaluateCostResult {
    pub fn state(&self) -> SessionState {
        self.session.state()
    }
}

/// Handler for cost evaluation.
pub struct EvaluateCostHandler {
    sessions: Arc<dyn SessionRepository>,
    budgets: Arc<dyn BudgetRepository>,
    estimator: Arc<CostEstimator>,
    notifier: Notifier,
}

impl EvaluateCostHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        budgets: Arc<dyn BudgetRepository>,
        estimator: Arc<CostEstimator>,
        notifier: Notifier,
    ) -> Self {
        Self {
            sessions,
            budgets,
            estimator,
            notifier,
        }
    }

    /// Moves a `Configured` session to `Authorized` or `Denied`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session or the group's budget is missing
    /// - `Forbidden` if the caller does not own the session
    /// - `InvalidStateTransition` unless the session is `Configured`
    /// - `UpstreamFailure` if the pricing oracle cannot be reached
    /// - `Conflict` if the session moved concurrently
    pub async fn handle(
        &self,
        cmd: EvaluateCostCommand,
        metadata: CommandMetadata,
    ) -> Result<EvaluateCostResult, DomainError> {
        let mut session =
            load_owned_session(self.sessions.as_ref(), &cmd.session_id, &metadata.actor).await?;
        if session.state() != SessionState::Configured {
            return Err(DomainError::invalid_state(format!(
                "Session {} is {}, only configured sessions can be evaluated",
                session.id(),
                session.state()
            )));
        }
        let config = session
            .config()
            .cloned()
            .ok_or_else(|| DomainError::internal("Configured session has no configuration"))?;

        let estimate = self.estimator.estimate(session.provider(), &config).await?;
        let budget = self
            .budgets
            .find(session.group_id())
            .await?
            .ok_or_else(|| DomainError::not_found("Budget", session.group_id()))?;

        let unestimable = estimate.is_unestimable();
        let estimated_cost = estimate.amount();
        let remaining = budget.remaining();
        let state = session.record_estimate(estimate, remaining)?;
        self.sessions
            .update(&session, SessionState::Configured)
            .await?;

        tracing::info!(
            session_id = %session.id(),
            group_id = %session.group_id(),
            username = %metadata.actor,
            estimated_cost = %estimated_cost,
            remaining = %remaining,
            unestimable,
            state = %state,
            "Session evaluated"
        );

        if state == SessionState::Denied {
            let service_type = config.service_type();
            self.notifier
                .notify_group_manager(session.group_id(), NotificationCategory::SessionDenied, |g| {
                    format!(
                        "User '{}' was denied {} in group '{}': estimated {} exceeds remaining {}",
                        session.username(),
                        service_type,
                        g.name(),
                        estimated_cost,
                        remaining
                    )
                })
                .await;
        }

        Ok(EvaluateCostResult {
            session,
            estimated_cost,
            remaining,
            unestimable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        as_user, ec2, username, vpc, World, MANAGER, MEMBER,
    };
    use crate::domain::catalog::{CloudProvider, ServiceConfig};
    use crate::domain::foundation::ErrorCode;
    use crate::ports::NotificationReader;

    async fn configured(world: &World, config: ServiceConfig) -> SessionId {
        let mut session =
            ProvisioningSession::open(username(MEMBER), world.group_id, CloudProvider::Aws);
        session.select_service(config).unwrap();
        world.store.save(&session).await.unwrap();
        *session.id()
    }

    fn handler(world: &World) -> EvaluateCostHandler {
        EvaluateCostHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.estimator(),
            world.notifier(),
        )
    }

    #[tokio::test]
    async fn authorizes_when_estimate_fits() {
        let world = World::with_budget(Money::from_dollars(500)).await;
        let id = configured(&world, ec2("web")).await;

        let result = handler(&world)
            .handle(EvaluateCostCommand { session_id: id }, as_user(MEMBER))
            .await
            .unwrap();

        assert_eq!(result.state(), SessionState::Authorized);
        assert_eq!(result.estimated_cost, Money::from_dollars(216));
        assert_eq!(result.remaining, Money::from_dollars(500));
        assert!(!result.unestimable);
    }

    #[tokio::test]
    async fn denies_and_notifies_when_estimate_exceeds_remaining() {
        let world = World::with_budget(Money::from_dollars(100)).await;
        let id = configured(&world, ec2("web")).await;

        let result = handler(&world)
            .handle(EvaluateCostCommand { session_id: id }, as_user(MEMBER))
            .await
            .unwrap();

        assert_eq!(result.state(), SessionState::Denied);
        let notices = world
            .store
            .list_for_manager(&username(MANAGER), 10)
            .await
            .unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].category, NotificationCategory::SessionDenied);
        assert!(notices[0].message.contains("'research'"));
        assert!(notices[0].message.contains("alice"));
    }

    #[tokio::test]
    async fn unestimable_service_is_authorized_with_empty_budget() {
        let world = World::with_budget(Money::ZERO).await;
        let id = configured(&world, vpc("core")).await;

        let result = handler(&world)
            .handle(EvaluateCostCommand { session_id: id }, as_user(MEMBER))
            .await
            .unwrap();

        assert_eq!(result.state(), SessionState::Authorized);
        assert!(result.unestimable);
        assert!(result.estimated_cost.is_zero());
    }

    #[tokio::test]
    async fn open_session_cannot_be_evaluated() {
        let world = World::with_budget(Money::from_dollars(500)).await;
        let session =
            ProvisioningSession::open(username(MEMBER), world.group_id, CloudProvider::Aws);
        world.store.save(&session).await.unwrap();

        let err = handler(&world)
            .handle(
                EvaluateCostCommand {
                    session_id: *session.id(),
                },
                as_user(MEMBER),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn second_evaluation_is_rejected() {
        let world = World::with_budget(Money::from_dollars(500)).await;
        let id = configured(&world, ec2("web")).await;
        let handler = handler(&world);
        handler
            .handle(EvaluateCostCommand { session_id: id }, as_user(MEMBER))
            .await
            .unwrap();

        let err = handler
            .handle(EvaluateCostCommand { session_id: id }, as_user(MEMBER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
