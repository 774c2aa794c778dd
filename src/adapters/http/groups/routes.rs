//! HTTP routes for group, membership and budget endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    add_member, allocate_budget, create_group, delete_group, get_budget, get_membership,
    list_groups, remove_member, revise_budget, GroupHandlers,
};

/// Creates the group router, mounted under `/api`.
pub fn group_routes(handlers: GroupHandlers) -> Router {
    Router::new()
        .route("/groups", post(create_group).get(list_groups))
        .route("/groups/membership/:username", get(get_membership))
        .route("/groups/:id", delete(delete_group))
        .route("/groups/:id/members", post(add_member))
        .route("/groups/:id/members/:username", delete(remove_member))
        .route(
            "/groups/:id/budget",
            post(allocate_budget).put(revise_budget).get(get_budget),
        )
        .with_state(handlers)
}
