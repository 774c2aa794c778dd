//! HTTP routes for account endpoints.

use axum::{
    routing::{delete, post},
    Router,
};

use super::handlers::{
    create_manager, create_user, delete_manager, delete_user, login, AccountHandlers,
};

/// Creates the account router, mounted under `/api`.
pub fn account_routes(handlers: AccountHandlers) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/admin/managers", post(create_manager))
        .route("/admin/managers/:username", delete(delete_manager))
        .route("/users", post(create_user))
        .route("/users/:username", delete(delete_user))
        .with_state(handlers)
}
