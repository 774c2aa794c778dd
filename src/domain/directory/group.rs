//! Group aggregate.
//!
//! A group is owned by one manager and holds a set of member usernames.
//! Budget figures live with the budget ledger, keyed by the same `GroupId`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{DomainError, GroupId, Timestamp, Username, ValidationError};

/// Maximum length for a group name.
pub const MAX_GROUP_NAME_LENGTH: usize = 100;

/// Group aggregate.
///
/// # Invariants
///
/// - `name` is 1-100 characters, trimmed
/// - `members` has no duplicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    manager: Username,
    name: String,
    members: BTreeSet<Username>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Group {
    /// Creates an empty group owned by `manager`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the name is blank or too long
    pub fn new(manager: Username, name: &str) -> Result<Self, DomainError> {
        let name = Self::validate_name(name)?;
        let now = Timestamp::now();
        Ok(Self {
            id: GroupId::new(),
            manager,
            name,
            members: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a group from persistence (no validation).
    pub fn reconstitute(
        id: GroupId,
        manager: Username,
        name: String,
        members: BTreeSet<Username>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            manager,
            name,
            members,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn manager(&self) -> &Username {
        &self.manager
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &BTreeSet<Username> {
        &self.members
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn is_member(&self, username: &Username) -> bool {
        self.members.contains(username)
    }

    pub fn is_owned_by(&self, manager: &Username) -> bool {
        &self.manager == manager
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that `manager` owns this group.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if another manager owns it
    pub fn authorize(&self, manager: &Username) -> Result<(), DomainError> {
        if self.is_owned_by(manager) {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "Group {} is not managed by {}",
                self.id, manager
            )))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a member.
    ///
    /// The global one-group-per-user rule is enforced by the directory
    /// store; this only guards against a duplicate within the group.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the user is already a member
    pub fn add_member(&mut self, username: Username) -> Result<(), DomainError> {
        if self.members.contains(&username) {
            return Err(DomainError::conflict(format!(
                "User {} is already a member of group {}",
                username, self.name
            )));
        }
        self.members.insert(username);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user is not a member
    pub fn remove_member(&mut self, username: &Username) -> Result<(), DomainError> {
        if !self.members.remove(username) {
            return Err(DomainError::not_found("Group member", username));
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn validate_name(name: &str) -> Result<String, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if trimmed.chars().count() > MAX_GROUP_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_GROUP_NAME_LENGTH as i64,
                trimmed.chars().count() as i64,
            ));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn name(s: &str) -> Username {
        Username::new(s).unwrap()
    }

    fn group() -> Group {
        Group::new(name("mgr"), "  platform  ").unwrap()
    }

    #[test]
    fn new_group_trims_name_and_starts_empty() {
        let g = group();
        assert_eq!(g.name(), "platform");
        assert!(g.members().is_empty());
        assert!(g.is_owned_by(&name("mgr")));
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            Group::new(name("mgr"), "  ").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn add_member_rejects_duplicates() {
        let mut g = group();
        g.add_member(name("alice")).unwrap();
        assert_eq!(
            g.add_member(name("alice")).unwrap_err().code,
            ErrorCode::Conflict
        );
        assert_eq!(g.members().len(), 1);
    }

    #[test]
    fn remove_member_requires_membership() {
        let mut g = group();
        assert_eq!(
            g.remove_member(&name("ghost")).unwrap_err().code,
            ErrorCode::NotFound
        );
        g.add_member(name("alice")).unwrap();
        g.remove_member(&name("alice")).unwrap();
        assert!(!g.is_member(&name("alice")));
    }

    #[test]
    fn authorize_rejects_other_managers() {
        let g = group();
        assert!(g.authorize(&name("mgr")).is_ok());
        assert_eq!(
            g.authorize(&name("other")).unwrap_err().code,
            ErrorCode::Forbidden
        );
    }
}
