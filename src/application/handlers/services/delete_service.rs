//! DeleteServiceHandler - tears a provisioned resource down.
//!
//! `Active -> Deleting -> (provider delete) -> Deleted`. Composite
//! resources with live dependents are refused before anything changes. A
//! failed provider delete leaves the record `Deleting`, from where the
//! call can be retried. Deletion does not refund the budget.

use std::sync::Arc;

use super::authorize_service_access;
use crate::application::services::{Notifier, ProvisioningDispatcher};
use crate::domain::foundation::{CommandMetadata, DomainError, SessionId};
use crate::domain::notification::NotificationCategory;
use crate::domain::registry::{ServiceRecord, ServiceStatus};
use crate::ports::{GroupRepository, ServiceRecordRepository};

pub struct DeleteServiceHandler {
    records: Arc<dyn ServiceRecordRepository>,
    groups: Arc<dyn GroupRepository>,
    dispatcher: Arc<ProvisioningDispatcher>,
    notifier: Notifier,
}

impl DeleteServiceHandler {
    pub fn new(
        records: Arc<dyn ServiceRecordRepository>,
        groups: Arc<dyn GroupRepository>,
        dispatcher: Arc<ProvisioningDispatcher>,
        notifier: Notifier,
    ) -> Self {
        Self {
            records,
            groups,
            dispatcher,
            notifier,
        }
    }

    /// # Errors
    ///
    /// - `NotFound` if no record exists for the session
    /// - `Forbidden` unless the caller owns the service or manages its group
    /// - `InvalidStateTransition` if the service is already deleted
    /// - `DependencyBlocked` if the resource still has dependents
    /// - `UpstreamFailure` if the provider delete fails or times out
    /// - `Conflict` if the record changed concurrently
    pub async fn handle(
        &self,
        session_id: SessionId,
        metadata: CommandMetadata,
    ) -> Result<ServiceRecord, DomainError> {
        let mut record = self
            .records
            .find_by_session(&session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Service", session_id))?;
        authorize_service_access(
            self.groups.as_ref(),
            record.group_id(),
            record.username(),
            &metadata,
        )
        .await?;
        if record.status() == ServiceStatus::Deleted {
            return Err(DomainError::invalid_state(format!(
                "Service {} is already deleted",
                session_id
            )));
        }

        let kind = record.kind();
        let resource_id = record.provider_resource_id().to_string();

        let dependents = self.dispatcher.dependents(kind, &resource_id).await?;
        if !dependents.is_empty() {
            let names: Vec<String> = dependents.iter().map(ToString::to_string).collect();
            tracing::info!(
                session_id = %session_id,
                resource_id = %resource_id,
                dependents = ?names,
                "Deletion blocked by dependents"
            );
            return Err(DomainError::dependency_blocked(&resource_id, &names));
        }

        if record.status() == ServiceStatus::Active {
            record.mark_deleting()?;
            self.records
                .update_status(&record, ServiceStatus::Active)
                .await?;
        }

        self.dispatcher.delete(kind, &resource_id).await?;

        record.mark_deleted()?;
        self.records
            .update_status(&record, ServiceStatus::Deleting)
            .await?;

        tracing::info!(
            session_id = %session_id,
            group_id = %record.group_id(),
            username = %record.username(),
            kind = %kind,
            resource_id = %resource_id,
            "Service deleted"
        );

        self.notifier
            .notify_group_manager(record.group_id(), NotificationCategory::ServiceDeleted, |g| {
                format!(
                    "{} resource '{}' of user '{}' in group '{}' was deleted by '{}'",
                    kind,
                    resource_id,
                    record.username(),
                    g.name(),
                    metadata.actor
                )
            })
            .await;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        as_manager, as_user, ec2, username, vpc, World, MANAGER, MEMBER,
    };
    use crate::domain::budget::BudgetUsage;
    use crate::domain::catalog::{CloudProvider, ServiceConfig};
    use crate::domain::foundation::{ErrorCode, Money};
    use crate::domain::provisioning::{CostEstimate, ProvisioningSession};
    use crate::domain::registry::Dependent;
    use crate::ports::{
        BudgetRepository, FinalizeCommit, FinalizeCommitter, NotificationReader, SessionRepository,
    };

    /// Creates the resource in the simulated cloud and commits its record.
    async fn provisioned(world: &World, config: ServiceConfig) -> ServiceRecord {
        let mut session =
            ProvisioningSession::open(username(MEMBER), world.group_id, CloudProvider::Aws);
        session.select_service(config.clone()).unwrap();
        session
            .record_estimate(CostEstimate::Unestimable, Money::ZERO)
            .unwrap();
        world.store.save(&session).await.unwrap();

        let resource_id = world
            .dispatcher()
            .create(session.kind().unwrap(), &config)
            .await
            .unwrap();
        let loaded = session.clone();
        let record = session.finalize(&resource_id, None).unwrap();
        let _: BudgetUsage = world
            .store
            .commit(&FinalizeCommit {
                session: loaded,
                record: record.clone(),
                amount: Money::ZERO,
            })
            .await
            .unwrap();
        record
    }

    fn handler(world: &World) -> DeleteServiceHandler {
        DeleteServiceHandler::new(
            world.store.clone(),
            world.store.clone(),
            world.dispatcher(),
            world.notifier(),
        )
    }

    async fn status_of(world: &World, id: &SessionId) -> ServiceStatus {
        world
            .store
            .find_by_session(id)
            .await
            .unwrap()
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn owner_deletes_service() {
        let world = World::with_budget(Money::from_dollars(10)).await;
        let record = provisioned(&world, ec2("web")).await;

        let deleted = handler(&world)
            .handle(*record.session_id(), as_user(MEMBER))
            .await
            .unwrap();

        assert_eq!(deleted.status(), ServiceStatus::Deleted);
        assert!(deleted.deleted_at().is_some());
        assert!(!world.cloud.is_live(record.provider_resource_id()).await);
        let notices = world
            .store
            .list_for_manager(&username(MANAGER), 10)
            .await
            .unwrap();
        assert_eq!(notices[0].category, NotificationCategory::ServiceDeleted);
    }

    #[tokio::test]
    async fn vpc_with_dependents_is_blocked_and_stays_active() {
        let world = World::with_budget(Money::from_dollars(10)).await;
        let record = provisioned(&world, vpc("core")).await;
        let vpc_id = record.provider_resource_id();
        world
            .cloud
            .attach_dependent(vpc_id, Dependent::new("internet_gateway", "igw-1"))
            .await
            .unwrap();
        world
            .cloud
            .attach_dependent(vpc_id, Dependent::new("subnet", "subnet-2"))
            .await
            .unwrap();

        let err = handler(&world)
            .handle(*record.session_id(), as_manager(MANAGER))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DependencyBlocked);
        assert_eq!(err.dependents().len(), 2);
        assert!(err.message.contains("igw-1"));
        assert!(err.message.contains("subnet-2"));
        assert_eq!(status_of(&world, record.session_id()).await, ServiceStatus::Active);
        assert!(world.cloud.is_live(vpc_id).await);
    }

    #[tokio::test]
    async fn failed_provider_delete_leaves_deleting_and_retry_finishes() {
        let world = World::with_budget(Money::from_dollars(10)).await;
        let record = provisioned(&world, ec2("web")).await;
        let handler = handler(&world);
        world.cloud.fail_next_deletes(1).await;

        let err = handler
            .handle(*record.session_id(), as_user(MEMBER))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamFailure);
        assert_eq!(
            status_of(&world, record.session_id()).await,
            ServiceStatus::Deleting
        );

        handler
            .handle(*record.session_id(), as_user(MEMBER))
            .await
            .unwrap();
        assert_eq!(
            status_of(&world, record.session_id()).await,
            ServiceStatus::Deleted
        );
    }

    #[tokio::test]
    async fn deleted_service_cannot_be_deleted_again() {
        let world = World::with_budget(Money::from_dollars(10)).await;
        let record = provisioned(&world, ec2("web")).await;
        let handler = handler(&world);
        handler
            .handle(*record.session_id(), as_user(MEMBER))
            .await
            .unwrap();

        let err = handler
            .handle(*record.session_id(), as_user(MEMBER))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let world = World::with_budget(Money::from_dollars(10)).await;
        let record = provisioned(&world, ec2("web")).await;

        let err = handler(&world)
            .handle(*record.session_id(), as_user("mallory"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn deletion_does_not_refund_budget() {
        let world = World::with_budget(Money::from_dollars(10)).await;
        world
            .store
            .debit(&world.group_id, Money::from_dollars(4))
            .await
            .unwrap();
        let record = provisioned(&world, ec2("web")).await;

        handler(&world)
            .handle(*record.session_id(), as_user(MEMBER))
            .await
            .unwrap();

        let budget = world.store.find(&world.group_id).await.unwrap().unwrap();
        assert_eq!(budget.used(), Money::from_dollars(4));
    }
}
