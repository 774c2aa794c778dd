//! UsageReportHandler - a user's active services and what they cost.

use std::sync::Arc;

use super::authorize_service_access;
use crate::domain::foundation::{CommandMetadata, DomainError, Money, Username};
use crate::domain::registry::{ServiceRecord, ServiceStatus};
use crate::ports::{GroupRepository, ServiceFilter, ServiceRecordRepository};

#[derive(Debug, Clone)]
pub struct UsageReport {
    pub username: Username,
    pub active_services: usize,
    pub total_cost: Money,
    pub services: Vec<ServiceRecord>,
}

pub struct UsageReportHandler {
    records: Arc<dyn ServiceRecordRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl UsageReportHandler {
    pub fn new(
        records: Arc<dyn ServiceRecordRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self { records, groups }
    }

    /// Reports on `username`, defaulting to the caller.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a manager asks about a user outside their groups
    pub async fn handle(
        &self,
        username: Option<Username>,
        metadata: CommandMetadata,
    ) -> Result<UsageReport, DomainError> {
        let username = username.unwrap_or_else(|| metadata.actor.clone());
        if username != metadata.actor {
            let group_id = self.groups.find_group_of(&username).await?.ok_or_else(|| {
                DomainError::forbidden(format!("'{}' is not in any of your groups", username))
            })?;
            authorize_service_access(self.groups.as_ref(), &group_id, &username, &metadata)
                .await?;
        }

        let services = self
            .records
            .list(
                &ServiceFilter::for_user(username.clone()).with_statuses(&[ServiceStatus::Active]),
            )
            .await?;
        let total_cost = services
            .iter()
            .try_fold(Money::ZERO, |sum, r| sum.checked_add(r.cost()))
            .ok_or_else(|| DomainError::internal("Usage total overflowed"))?;

        Ok(UsageReport {
            username,
            active_services: services.len(),
            total_cost,
            services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        as_manager, as_user, ec2, username, World, MANAGER, MEMBER,
    };
    use crate::domain::catalog::CloudProvider;
    use crate::domain::foundation::{ErrorCode, UnitPrice};
    use crate::domain::provisioning::{CostEstimate, ProvisioningSession};
    use crate::ports::{FinalizeCommit, FinalizeCommitter, SessionRepository};

    async fn commit(world: &World, name: &str, dollars: u64) {
        let mut session =
            ProvisioningSession::open(username(MEMBER), world.group_id, CloudProvider::Aws);
        session.select_service(ec2(name)).unwrap();
        session
            .record_estimate(
                CostEstimate::priced(UnitPrice::from_micros(1), dollars * 1_000_000),
                Money::from_dollars(1_000),
            )
            .unwrap();
        world.store.save(&session).await.unwrap();
        let loaded = session.clone();
        let record = session.finalize(&format!("i-{}", name), None).unwrap();
        world
            .store
            .commit(&FinalizeCommit {
                session: loaded,
                amount: record.cost(),
                record,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn totals_active_services() {
        let world = World::with_budget(Money::from_dollars(1_000)).await;
        commit(&world, "a", 120).await;
        commit(&world, "b", 80).await;

        let report = UsageReportHandler::new(world.store.clone(), world.store.clone())
            .handle(None, as_user(MEMBER))
            .await
            .unwrap();

        assert_eq!(report.active_services, 2);
        assert_eq!(report.total_cost, Money::from_dollars(200));
    }

    #[tokio::test]
    async fn manager_reads_member_report() {
        let world = World::with_budget(Money::from_dollars(1_000)).await;
        commit(&world, "a", 10).await;

        let report = UsageReportHandler::new(world.store.clone(), world.store.clone())
            .handle(Some(username(MEMBER)), as_manager(MANAGER))
            .await
            .unwrap();

        assert_eq!(report.total_cost, Money::from_dollars(10));
    }

    #[tokio::test]
    async fn users_cannot_read_each_other() {
        let world = World::with_budget(Money::from_dollars(1_000)).await;

        let err = UsageReportHandler::new(world.store.clone(), world.store.clone())
            .handle(Some(username(MEMBER)), as_user("bob"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
