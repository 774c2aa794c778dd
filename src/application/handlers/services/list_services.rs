//! ListServicesHandler - filtered service listings.
//!
//! Users see their own services, managers see their groups' services,
//! administrators see everything.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError, GroupId, Role};
use crate::domain::registry::{ServiceRecord, ServiceStatus};
use crate::ports::{GroupRepository, ServiceFilter, ServiceRecordRepository};

/// Narrowing applied on top of the caller's visibility.
#[derive(Debug, Clone, Default)]
pub struct ListServicesQuery {
    pub group_id: Option<GroupId>,
    /// Empty means every status.
    pub statuses: Vec<ServiceStatus>,
}

pub struct ListServicesHandler {
    records: Arc<dyn ServiceRecordRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl ListServicesHandler {
    pub fn new(
        records: Arc<dyn ServiceRecordRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self { records, groups }
    }

    /// Lists visible services, newest first.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a manager names a group they do not own
    pub async fn handle(
        &self,
        query: ListServicesQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<ServiceRecord>, DomainError> {
        let base = ServiceFilter {
            group_id: query.group_id,
            username: None,
            statuses: query.statuses,
        };

        match metadata.role {
            Role::Admin => self.records.list(&base).await,
            Role::User => {
                let filter = ServiceFilter {
                    username: Some(metadata.actor),
                    ..base
                };
                self.records.list(&filter).await
            }
            Role::Manager => {
                let owned = self.groups.list_by_manager(&metadata.actor).await?;
                if let Some(group_id) = &base.group_id {
                    if !owned.iter().any(|g| g.id() == group_id) {
                        return Err(DomainError::forbidden(format!(
                            "Group {} is not managed by {}",
                            group_id, metadata.actor
                        )));
                    }
                    return self.records.list(&base).await;
                }

                let mut records = Vec::new();
                for group in owned {
                    let filter = ServiceFilter {
                        group_id: Some(*group.id()),
                        ..base.clone()
                    };
                    records.extend(self.records.list(&filter).await?);
                }
                records.sort_by(|a, b| b.created_at().cmp(a.created_at()));
                Ok(records)
            }
        }
    }
}
