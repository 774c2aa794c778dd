//! GetMembershipHandler - which group, if any, a user belongs to.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, GroupId, Username};
use crate::ports::GroupRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub username: Username,
    pub group_id: Option<GroupId>,
}

impl Membership {
    pub fn is_member(&self) -> bool {
        self.group_id.is_some()
    }
}

pub struct GetMembershipHandler {
    groups: Arc<dyn GroupRepository>,
}

impl GetMembershipHandler {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn handle(&self, username: Username) -> Result<Membership, DomainError> {
        let group_id = self.groups.find_group_of(&username).await?;
        Ok(Membership { username, group_id })
    }

    /// Resolves the user's group.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user belongs to no group
    pub async fn resolve(&self, username: &Username) -> Result<GroupId, DomainError> {
        self.groups
            .find_group_of(username)
            .await?
            .ok_or_else(|| DomainError::not_found("Group membership", username))
    }
}
