//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates Bearer tokens and injects the caller into extensions
//! - `RequireAuth` - Extractor that requires an authenticated caller
//! - `RequireAuth::require` - Role gate that turns the caller into `CommandMetadata`
//!
//! # Architecture
//!
//! The middleware uses the `TokenValidator` port, keeping it independent of
//! the token format.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//!                                      ↓
//!                              auth.require(&[Role::Manager])? → CommandMetadata
//! ```
//!
//! A missing or invalid token yields 401. A valid token with the wrong role
//! yields 403.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::super::error::{ApiError, ErrorResponse};
use crate::domain::foundation::{AuthError, AuthenticatedUser, CommandMetadata, DomainError, Role};
use crate::ports::TokenValidator;

/// Auth middleware state - wraps the token validator.
pub type AuthState = Arc<dyn TokenValidator>;

/// Authentication middleware that validates Bearer tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the `TokenValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing token, continues without injecting (public routes such as login)
/// 5. On invalid token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            let (status, message) = match &e {
                AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                AuthError::ServiceUnavailable(msg) => {
                    tracing::error!("Token validation unavailable: {}", msg);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Authentication service unavailable",
                    )
                }
                _ => (StatusCode::UNAUTHORIZED, "Invalid token"),
            };
            (status, Json(ErrorResponse::unauthorized(message))).into_response()
        }
    }
}

/// Extractor that requires authentication.
///
/// If no caller is in the request extensions (no token, or the middleware
/// is not installed), returns 401 Unauthorized.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl RequireAuth {
    /// Checks the caller's role and builds the command context.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the caller's role is not among `allowed`
    pub fn require(self, allowed: &[Role]) -> Result<CommandMetadata, ApiError> {
        let RequireAuth(user) = self;
        if !user.has_role(allowed) {
            tracing::debug!(username = %user.username, role = %user.role, "Role not permitted");
            return Err(DomainError::forbidden(format!(
                "Role {} may not perform this operation",
                user.role
            ))
            .into());
        }
        Ok(CommandMetadata::new(user.username, user.role).with_source("api"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::unauthorized("Authentication required")),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Username;
    use axum::http::Request as HttpRequest;

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser::new(Username::new("alice").unwrap(), role)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // RequireAuth Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_auth_extracts_user_from_extensions() {
        let mut request: HttpRequest<()> = HttpRequest::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(caller(Role::User));
        let (mut parts, _body) = request.into_parts();

        let RequireAuth(user) = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn require_auth_fails_without_user() {
        let request: HttpRequest<()> = HttpRequest::builder().uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Role Gate Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn permitted_role_yields_metadata() {
        let metadata = RequireAuth(caller(Role::Manager))
            .require(&[Role::Manager, Role::Admin])
            .unwrap();
        assert_eq!(metadata.actor.as_str(), "alice");
        assert_eq!(metadata.role, Role::Manager);
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let err = RequireAuth(caller(Role::User))
            .require(&[Role::Manager])
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn auth_rejection_returns_401() {
        let response = AuthRejection::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn auth_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthState>();
        assert_send_sync::<RequireAuth>();
    }
}
