//! HTTP handlers for group, membership and budget endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::{parse_path_id, ApiResult};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::budget::{
    AllocateBudgetCommand, AllocateBudgetHandler, GetBudgetHandler, ReviseBudgetCommand,
    ReviseBudgetHandler,
};
use crate::application::handlers::directory::{
    AddMemberCommand, AddMemberHandler, CreateGroupCommand, CreateGroupHandler,
    DeleteGroupHandler, GetMembershipHandler, ListGroupsHandler, RemoveMemberCommand,
    RemoveMemberHandler,
};
use crate::domain::foundation::{DomainError, GroupId, Money, Role, Username};

use super::dto::{
    AddMemberRequest, BudgetRequest, BudgetResponse, CreateGroupRequest, GroupResponse,
    MembershipResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct GroupHandlers {
    pub create_group: Arc<CreateGroupHandler>,
    pub list_groups: Arc<ListGroupsHandler>,
    pub delete_group: Arc<DeleteGroupHandler>,
    pub add_member: Arc<AddMemberHandler>,
    pub remove_member: Arc<RemoveMemberHandler>,
    pub get_membership: Arc<GetMembershipHandler>,
    pub allocate_budget: Arc<AllocateBudgetHandler>,
    pub revise_budget: Arc<ReviseBudgetHandler>,
    pub get_budget: Arc<GetBudgetHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// Groups
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/groups - Create a group owned by the calling manager
pub async fn create_group(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<GroupResponse>)> {
    let metadata = auth.require(&[Role::Manager])?;
    let Json(req) = payload?;
    let group = handlers
        .create_group
        .handle(CreateGroupCommand { name: req.name }, metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

/// GET /api/groups - List the calling manager's groups with their budgets
pub async fn list_groups(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
) -> ApiResult<Json<Vec<GroupResponse>>> {
    let metadata = auth.require(&[Role::Manager])?;
    let views = handlers.list_groups.handle(metadata).await?;
    Ok(Json(views.into_iter().map(GroupResponse::from).collect()))
}

/// DELETE /api/groups/:id - Delete an empty group
pub async fn delete_group(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path(group_id): Path<String>,
) -> ApiResult<StatusCode> {
    let metadata = auth.require(&[Role::Manager])?;
    let group_id: GroupId = parse_path_id(&group_id, "group_id")?;
    handlers.delete_group.handle(group_id, metadata).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Membership
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/groups/:id/members - Add a user to a group
pub async fn add_member(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path(group_id): Path<String>,
    payload: Result<Json<AddMemberRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let metadata = auth.require(&[Role::Manager])?;
    let group_id: GroupId = parse_path_id(&group_id, "group_id")?;
    let Json(req) = payload?;
    let cmd = AddMemberCommand {
        group_id,
        username: Username::new(req.username)?,
    };
    handlers.add_member.handle(cmd, metadata).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/groups/:id/members/:username - Remove a user from a group
pub async fn remove_member(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path((group_id, username)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let metadata = auth.require(&[Role::Manager])?;
    let cmd = RemoveMemberCommand {
        group_id: parse_path_id(&group_id, "group_id")?,
        username: Username::new(username)?,
    };
    handlers.remove_member.handle(cmd, metadata).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/groups/membership/:username - Which group a user belongs to
///
/// Managers and administrators may ask about anyone; users only about themselves.
pub async fn get_membership(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path(username): Path<String>,
) -> ApiResult<Json<MembershipResponse>> {
    let metadata = auth.require(&[Role::Admin, Role::Manager, Role::User])?;
    let username = Username::new(username)?;
    if metadata.role == Role::User && username != metadata.actor {
        return Err(DomainError::forbidden("Users may only look up their own membership").into());
    }
    let membership = handlers.get_membership.handle(username).await?;
    Ok(Json(membership.into()))
}

// ════════════════════════════════════════════════════════════════════════════
// Budget
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/groups/:id/budget - Allocate a group's budget
pub async fn allocate_budget(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path(group_id): Path<String>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BudgetResponse>)> {
    let metadata = auth.require(&[Role::Manager])?;
    let group_id: GroupId = parse_path_id(&group_id, "group_id")?;
    let Json(req) = payload?;
    let cmd = AllocateBudgetCommand {
        group_id,
        total: Money::from_cents(req.total_cents),
    };
    let usage = handlers.allocate_budget.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(usage.into())))
}

/// PUT /api/groups/:id/budget - Revise a group's budget total
pub async fn revise_budget(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path(group_id): Path<String>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> ApiResult<Json<BudgetResponse>> {
    let metadata = auth.require(&[Role::Manager])?;
    let group_id: GroupId = parse_path_id(&group_id, "group_id")?;
    let Json(req) = payload?;
    let cmd = ReviseBudgetCommand {
        group_id,
        total: Money::from_cents(req.total_cents),
    };
    let usage = handlers.revise_budget.handle(cmd, metadata).await?;
    Ok(Json(usage.into()))
}

/// GET /api/groups/:id/budget - Read a group's budget (owner or member)
pub async fn get_budget(
    State(handlers): State<GroupHandlers>,
    auth: RequireAuth,
    Path(group_id): Path<String>,
) -> ApiResult<Json<BudgetResponse>> {
    let metadata = auth.require(&[Role::Manager, Role::User])?;
    let group_id: GroupId = parse_path_id(&group_id, "group_id")?;
    let usage = handlers.get_budget.handle(group_id, metadata).await?;
    Ok(Json(usage.into()))
}
