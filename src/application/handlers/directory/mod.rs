//! Group directory handlers.
//!
//! Managers own groups; every mutation is scoped to the calling manager.

mod add_member;
mod create_group;
mod delete_group;
mod get_membership;
mod list_groups;
mod remove_member;

pub use add_member::{AddMemberCommand, AddMemberHandler};
pub use create_group::{CreateGroupCommand, CreateGroupHandler};
pub use delete_group::DeleteGroupHandler;
pub use get_membership::{GetMembershipHandler, Membership};
pub use list_groups::{GroupView, ListGroupsHandler};
pub use remove_member::{RemoveMemberCommand, RemoveMemberHandler};

use crate::domain::directory::Group;
use crate::domain::foundation::{DomainError, GroupId, Username};
use crate::ports::GroupRepository;

/// Loads a group and checks that `manager` owns it.
///
/// # Errors
///
/// - `NotFound` if the group does not exist
/// - `Forbidden` if another manager owns it
pub(in crate::application) async fn load_owned_group(
    groups: &dyn GroupRepository,
    id: &GroupId,
    manager: &Username,
) -> Result<Group, DomainError> {
    let group = groups
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Group", id))?;
    group.authorize(manager)?;
    Ok(group)
}
