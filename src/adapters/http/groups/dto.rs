//! Request and response bodies for group and budget endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::directory::{GroupView, Membership};
use crate::domain::budget::BudgetUsage;
use crate::domain::directory::Group;
use crate::domain::foundation::{GroupId, Timestamp};

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: GroupId,
    pub name: String,
    pub manager: String,
    pub members: Vec<String>,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetResponse>,
}

impl GroupResponse {
    fn from_group(group: Group, budget: Option<BudgetUsage>) -> Self {
        Self {
            id: *group.id(),
            name: group.name().to_string(),
            manager: group.manager().to_string(),
            members: group.members().iter().map(ToString::to_string).collect(),
            created_at: *group.created_at(),
            budget: budget.map(BudgetResponse::from),
        }
    }
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self::from_group(group, None)
    }
}

impl From<GroupView> for GroupResponse {
    fn from(view: GroupView) -> Self {
        Self::from_group(view.group, view.budget)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub username: String,
    pub group_id: Option<GroupId>,
    pub is_member: bool,
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            is_member: membership.is_member(),
            username: membership.username.to_string(),
            group_id: membership.group_id,
        }
    }
}

/// Body for allocating or revising a budget, in cents.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub total_cents: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub group_id: GroupId,
    pub total_cents: u64,
    pub used_cents: u64,
    pub remaining_cents: u64,
}

impl From<BudgetUsage> for BudgetResponse {
    fn from(usage: BudgetUsage) -> Self {
        Self {
            group_id: usage.group_id,
            total_cents: usage.total.cents(),
            used_cents: usage.used.cents(),
            remaining_cents: usage.remaining.cents(),
        }
    }
}
