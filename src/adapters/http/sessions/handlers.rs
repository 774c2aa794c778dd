//! HTTP handlers for the provisioning session workflow.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::{parse_path_id, ApiError, ApiResult};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::provisioning::{
    AbandonSessionCommand, AbandonSessionHandler, EvaluateCostCommand, EvaluateCostHandler,
    FinalizeSessionCommand, FinalizeSessionHandler, GetSessionHandler, ProvisionSessionCommand,
    ProvisionSessionHandler, SelectServiceCommand, SelectServiceHandler, StartSessionCommand,
    StartSessionHandler,
};
use crate::domain::catalog::ServiceConfig;
use crate::domain::foundation::{DomainError, Role, SessionId};
use crate::domain::provisioning::SessionState;

use super::dto::{
    EvaluationResponse, FinalizeRequest, FinalizeResponse, ProvisionParams, SessionResponse,
    StartSessionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    pub start_session: Arc<StartSessionHandler>,
    pub get_session: Arc<GetSessionHandler>,
    pub select_service: Arc<SelectServiceHandler>,
    pub evaluate_cost: Arc<EvaluateCostHandler>,
    pub provision_session: Arc<ProvisionSessionHandler>,
    pub finalize_session: Arc<FinalizeSessionHandler>,
    pub abandon_session: Arc<AbandonSessionHandler>,
}

fn session_id(raw: &str) -> ApiResult<SessionId> {
    parse_path_id(raw, "session_id")
}

// ════════════════════════════════════════════════════════════════════════════
// Session lifecycle
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Open a session against a provider
pub async fn start_session(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let metadata = auth.require(&[Role::User])?;
    let Json(req) = payload?;
    let session = handlers
        .start_session
        .handle(StartSessionCommand { provider: req.provider }, metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// GET /api/sessions/:id - Current state of one of the caller's sessions
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionResponse>> {
    let metadata = auth.require(&[Role::User])?;
    let session = handlers.get_session.handle(session_id(&id)?, metadata).await?;
    Ok(Json(session.into()))
}

/// PUT /api/sessions/:id/service - Choose the service and its configuration
pub async fn select_service(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    Path(id): Path<String>,
    payload: Result<Json<ServiceConfig>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let metadata = auth.require(&[Role::User])?;
    let session_id = session_id(&id)?;
    let Json(config) = payload?;
    let session = handlers
        .select_service
        .handle(SelectServiceCommand { session_id, config }, metadata)
        .await?;
    Ok(Json(session.into()))
}

/// POST /api/sessions/:id/evaluate - Estimate the cost and gate on the budget
///
/// A denied session is reported as 402 with the required and remaining
/// amounts; the session itself stays readable in the `denied` state.
pub async fn evaluate_cost(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<EvaluationResponse>> {
    let metadata = auth.require(&[Role::User])?;
    let session_id = session_id(&id)?;
    let result = handlers
        .evaluate_cost
        .handle(EvaluateCostCommand { session_id }, metadata)
        .await?;

    if result.state() == SessionState::Denied {
        return Err(ApiError(
            DomainError::insufficient_budget(result.estimated_cost, result.remaining)
                .with_detail("session_id", session_id.to_string())
                .with_detail("state", SessionState::Denied.as_str()),
        ));
    }
    Ok(Json(result.into()))
}

/// POST /api/sessions/:id/provision - Create the resource and finalize in one step
pub async fn provision_session(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    Path(id): Path<String>,
    Query(params): Query<ProvisionParams>,
) -> ApiResult<(StatusCode, Json<FinalizeResponse>)> {
    let metadata = auth.require(&[Role::User])?;
    let cmd = ProvisionSessionCommand {
        session_id: session_id(&id)?,
        timeout: params.timeout_secs.map(Duration::from_secs),
    };
    let result = handlers.provision_session.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/sessions/:id/finalize - Record a resource created out of band
///
/// Repeating the call for a finalized session is a conflict.
pub async fn finalize_session(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    Path(id): Path<String>,
    payload: Result<Json<FinalizeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FinalizeResponse>)> {
    let metadata = auth.require(&[Role::User])?;
    let session_id = session_id(&id)?;
    let Json(req) = payload?;
    let cmd = FinalizeSessionCommand {
        session_id,
        provider_resource_id: req.provider_resource_id,
        final_config: req.final_config,
    };
    let result = handlers.finalize_session.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// DELETE /api/sessions/:id - Abandon a session that has not been finalized
pub async fn abandon_session(
    State(handlers): State<SessionHandlers>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let metadata = auth.require(&[Role::User])?;
    let cmd = AbandonSessionCommand {
        session_id: session_id(&id)?,
    };
    handlers.abandon_session.handle(cmd, metadata).await?;
    Ok(StatusCode::NO_CONTENT)
}
