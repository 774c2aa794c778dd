//! HTTP handlers for service listing, usage reports and deletion.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::adapters::http::error::{parse_path_id, ApiResult};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::services::{
    DeleteServiceHandler, ListServicesHandler, ListServicesQuery, UsageReportHandler,
};
use crate::domain::foundation::{Role, SessionId, Username};

use super::dto::{ListServicesParams, ServiceResponse, UsageReportParams, UsageReportResponse};

const ANY_ROLE: [Role; 3] = [Role::Admin, Role::Manager, Role::User];

#[derive(Clone)]
pub struct ServiceHandlers {
    pub list_services: Arc<ListServicesHandler>,
    pub usage_report: Arc<UsageReportHandler>,
    pub delete_service: Arc<DeleteServiceHandler>,
}

/// GET /api/services - Services visible to the caller
///
/// Users see their own, managers those of their groups, admins all.
pub async fn list_services(
    State(handlers): State<ServiceHandlers>,
    auth: RequireAuth,
    Query(params): Query<ListServicesParams>,
) -> ApiResult<Json<Vec<ServiceResponse>>> {
    let metadata = auth.require(&ANY_ROLE)?;
    let query = ListServicesQuery {
        group_id: params.group_id,
        statuses: params.statuses()?,
    };
    let records = handlers.list_services.handle(query, metadata).await?;
    Ok(Json(records.into_iter().map(ServiceResponse::from).collect()))
}

/// GET /api/services/report - Active services and their total cost for one user
pub async fn usage_report(
    State(handlers): State<ServiceHandlers>,
    auth: RequireAuth,
    Query(params): Query<UsageReportParams>,
) -> ApiResult<Json<UsageReportResponse>> {
    let metadata = auth.require(&ANY_ROLE)?;
    let username = params.username.map(Username::new).transpose()?;
    let report = handlers.usage_report.handle(username, metadata).await?;
    Ok(Json(report.into()))
}

/// DELETE /api/services/:session_id - Tear down a provisioned resource
pub async fn delete_service(
    State(handlers): State<ServiceHandlers>,
    auth: RequireAuth,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ServiceResponse>> {
    let metadata = auth.require(&ANY_ROLE)?;
    let session_id: SessionId = parse_path_id(&session_id, "session_id")?;
    let record = handlers.delete_service.handle(session_id, metadata).await?;
    Ok(Json(record.into()))
}
