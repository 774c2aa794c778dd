//! Group repository port.
//!
//! Persists groups and the global membership index.
//!
//! # Atomicity
//!
//! Two checks must hold under concurrency and are therefore the
//! implementation's job rather than the caller's:
//! - a manager never owns more than their group limit (checked on create)
//! - a user belongs to at most one group (checked on add)

use crate::domain::directory::Group;
use crate::domain::foundation::{DomainError, GroupId, Username};
use async_trait::async_trait;

/// Repository port for Group aggregates and memberships.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Create a group if its manager is below `group_limit`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the manager already has a group with this name
    /// - `QuotaExceeded` if the manager already owns `group_limit` groups
    /// - `DatabaseError` on persistence failure
    async fn create(&self, group: &Group, group_limit: u32) -> Result<(), DomainError>;

    /// Find a group by ID.
    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, DomainError>;

    /// List a manager's groups, ordered by name.
    async fn list_by_manager(&self, manager: &Username) -> Result<Vec<Group>, DomainError>;

    /// Delete a group along with its budget.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the group doesn't exist
    /// - `Conflict` if it still has members
    async fn delete(&self, id: &GroupId) -> Result<(), DomainError>;

    /// Add a user to a group, enforcing one group per user.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the group doesn't exist
    /// - `Conflict` if the user is already in any group, this one included
    async fn add_member(&self, id: &GroupId, username: &Username) -> Result<(), DomainError>;

    /// Remove a user from a group.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user is not a member of this group
    async fn remove_member(&self, id: &GroupId, username: &Username) -> Result<(), DomainError>;

    /// Look up the group a user belongs to.
    async fn find_group_of(&self, username: &Username) -> Result<Option<GroupId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn GroupRepository) {}
    }
}
