//! HTTP adapter for the manager notification inbox.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::adapters::http::error::ApiResult;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::notifications::ListNotificationsHandler;
use crate::domain::foundation::Role;
use crate::domain::notification::Notification;

#[derive(Clone)]
pub struct NotificationHandlers {
    pub list_notifications: Arc<ListNotificationsHandler>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationParams {
    pub limit: Option<usize>,
}

/// GET /api/notifications - The calling manager's notices, newest first
pub async fn list_notifications(
    State(handlers): State<NotificationHandlers>,
    auth: RequireAuth,
    Query(params): Query<NotificationParams>,
) -> ApiResult<Json<Vec<Notification>>> {
    let metadata = auth.require(&[Role::Manager])?;
    let notices = handlers
        .list_notifications
        .handle(params.limit, metadata)
        .await?;
    Ok(Json(notices))
}

/// Creates the notification router, mounted under `/api`.
pub fn notification_routes(handlers: NotificationHandlers) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications))
        .with_state(handlers)
}
