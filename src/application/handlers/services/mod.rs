//! Service registry handlers: listing, usage reports and deletion.

mod delete_service;
mod list_services;
mod usage_report;

pub use delete_service::DeleteServiceHandler;
pub use list_services::{ListServicesHandler, ListServicesQuery};
pub use usage_report::{UsageReport, UsageReportHandler};

use crate::domain::foundation::{CommandMetadata, DomainError, GroupId, Role, Username};
use crate::ports::GroupRepository;

/// Checks that the caller may see or act on services of `owner` in
/// `group_id`: the owner themselves, the group's manager, or an admin.
///
/// # Errors
///
/// - `Forbidden` otherwise
async fn authorize_service_access(
    groups: &dyn GroupRepository,
    group_id: &GroupId,
    owner: &Username,
    metadata: &CommandMetadata,
) -> Result<(), DomainError> {
    if &metadata.actor == owner || metadata.role == Role::Admin {
        return Ok(());
    }
    if metadata.role == Role::Manager {
        if let Some(group) = groups.find_by_id(group_id).await? {
            if group.is_owned_by(&metadata.actor) {
                return Ok(());
            }
        }
    }
    Err(DomainError::forbidden(format!(
        "'{}' cannot access services of '{}'",
        metadata.actor, owner
    )))
}
