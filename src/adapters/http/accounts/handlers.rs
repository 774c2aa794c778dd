//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::ApiResult;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::accounts::{
    CreateManagerCommand, CreateManagerHandler, CreateUserCommand, CreateUserHandler,
    DeleteManagerHandler, DeleteUserHandler, LoginCommand, LoginHandler,
};
use crate::domain::foundation::{Role, Username};

use super::dto::{
    AccountResponse, CreateManagerRequest, CreateUserRequest, LoginRequest, LoginResponse,
    ManagerResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AccountHandlers {
    login_handler: Arc<LoginHandler>,
    create_manager_handler: Arc<CreateManagerHandler>,
    delete_manager_handler: Arc<DeleteManagerHandler>,
    create_user_handler: Arc<CreateUserHandler>,
    delete_user_handler: Arc<DeleteUserHandler>,
}

impl AccountHandlers {
    pub fn new(
        login_handler: Arc<LoginHandler>,
        create_manager_handler: Arc<CreateManagerHandler>,
        delete_manager_handler: Arc<DeleteManagerHandler>,
        create_user_handler: Arc<CreateUserHandler>,
        delete_user_handler: Arc<DeleteUserHandler>,
    ) -> Self {
        Self {
            login_handler,
            create_manager_handler,
            delete_manager_handler,
            create_user_handler,
            delete_user_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/auth/login - Exchange credentials for a bearer token
pub async fn login(
    State(handlers): State<AccountHandlers>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    let cmd = LoginCommand {
        username: Username::new(req.username)?,
        password: req.password,
    };
    let result = handlers.login_handler.handle(cmd).await?;
    Ok(Json(result.into()))
}

/// POST /api/admin/managers - Create a manager (admin only)
pub async fn create_manager(
    State(handlers): State<AccountHandlers>,
    auth: RequireAuth,
    payload: Result<Json<CreateManagerRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ManagerResponse>)> {
    let metadata = auth.require(&[Role::Admin])?;
    let Json(req) = payload?;
    let cmd = CreateManagerCommand {
        username: Username::new(req.username)?,
        password: req.password,
        group_limit: req.group_limit,
    };
    let manager = handlers.create_manager_handler.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(manager.into())))
}

/// DELETE /api/admin/managers/:username - Delete a manager (admin only)
pub async fn delete_manager(
    State(handlers): State<AccountHandlers>,
    auth: RequireAuth,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    let metadata = auth.require(&[Role::Admin])?;
    handlers
        .delete_manager_handler
        .handle(Username::new(username)?, metadata)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users - Create a user account (manager only)
pub async fn create_user(
    State(handlers): State<AccountHandlers>,
    auth: RequireAuth,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let metadata = auth.require(&[Role::Manager])?;
    let Json(req) = payload?;
    let cmd = CreateUserCommand {
        username: Username::new(req.username)?,
        password: req.password,
    };
    let account = handlers.create_user_handler.handle(cmd, metadata).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// DELETE /api/users/:username - Delete a user account (manager only)
pub async fn delete_user(
    State(handlers): State<AccountHandlers>,
    auth: RequireAuth,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    let metadata = auth.require(&[Role::Manager])?;
    handlers
        .delete_user_handler
        .handle(Username::new(username)?, metadata)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
