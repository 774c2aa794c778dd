//! HTTP adapter for groups, memberships and budgets.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddMemberRequest, BudgetRequest, BudgetResponse, CreateGroupRequest, GroupResponse,
    MembershipResponse,
};
pub use handlers::GroupHandlers;
pub use routes::group_routes;
