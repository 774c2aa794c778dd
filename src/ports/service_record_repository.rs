//! Service record repository port.
//!
//! Records are inserted only by [`FinalizeCommitter`](super::FinalizeCommitter);
//! this port reads them and persists deletion-workflow status changes.

use crate::domain::foundation::{DomainError, GroupId, SessionId, Username};
use crate::domain::registry::{ServiceRecord, ServiceStatus};
use async_trait::async_trait;

/// Filter for listing service records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub group_id: Option<GroupId>,
    pub username: Option<Username>,
    pub statuses: Vec<ServiceStatus>,
}

impl ServiceFilter {
    pub fn for_group(group_id: GroupId) -> Self {
        Self {
            group_id: Some(group_id),
            ..Self::default()
        }
    }

    pub fn for_user(username: Username) -> Self {
        Self {
            username: Some(username),
            ..Self::default()
        }
    }

    pub fn with_statuses(mut self, statuses: &[ServiceStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    /// True if `record` passes every set criterion.
    pub fn matches(&self, record: &ServiceRecord) -> bool {
        self.group_id.map_or(true, |g| record.group_id() == &g)
            && self
                .username
                .as_ref()
                .map_or(true, |u| record.username() == u)
            && (self.statuses.is_empty() || self.statuses.contains(&record.status()))
    }
}

/// Repository port for ServiceRecord aggregates.
#[async_trait]
pub trait ServiceRecordRepository: Send + Sync {
    /// Find the record created from a session.
    async fn find_by_session(&self, id: &SessionId) -> Result<Option<ServiceRecord>, DomainError>;

    /// List records matching a filter, newest first.
    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<ServiceRecord>, DomainError>;

    /// Persist a status change made by the deletion workflow.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record doesn't exist
    /// - `Conflict` if the stored status is no longer `expected`
    async fn update_status(
        &self,
        record: &ServiceRecord,
        expected: ServiceStatus,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_record_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ServiceRecordRepository) {}
    }

    #[test]
    fn default_filter_is_unrestricted() {
        let filter = ServiceFilter::default();
        assert!(filter.group_id.is_none());
        assert!(filter.statuses.is_empty());
    }
}
