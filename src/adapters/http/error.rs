//! Error responses for the REST API.
//!
//! Every handler returns `Result<_, ApiError>`. The error body is always
//!
//! ```json
//! { "code": "INSUFFICIENT_BUDGET", "message": "...", "details": { ... } }
//! ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed.to_string(), message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized.to_string(), message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden.to_string(), message)
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        let mut details: BTreeMap<String, serde_json::Value> = error
            .details
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        // Dependents travel as a list so clients need not split strings.
        if error.code == ErrorCode::DependencyBlocked {
            details.insert("dependents".to_string(), serde_json::json!(error.dependents()));
        }

        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            details,
        }
    }
}

/// HTTP status for each domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict
        | ErrorCode::InvalidStateTransition
        | ErrorCode::DependencyBlocked => StatusCode::CONFLICT,
        ErrorCode::QuotaExceeded => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InsufficientBudget => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::UpstreamFailure => StatusCode::BAD_GATEWAY,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self(error.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::validation("body", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.code);
        if status.is_server_error() {
            tracing::error!(code = %self.0.code, "Request failed: {}", self.0.message);
        } else {
            tracing::debug!(code = %self.0.code, "Request rejected: {}", self.0.message);
        }

        let mut body = ErrorResponse::from(&self.0);
        // Infrastructure detail stays in the logs.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            body.message = "Internal server error".to_string();
            body.details.clear();
        }
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Parses an identifier taken from the URL path.
///
/// # Errors
///
/// - `ValidationFailed` naming `field` if `raw` does not parse
pub fn parse_path_id<T: std::str::FromStr>(raw: &str, field: &str) -> ApiResult<T> {
    raw.parse()
        .map_err(|_| DomainError::validation(field, format!("'{}' is not a valid {}", raw, field)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    #[test]
    fn every_code_maps_to_the_documented_status() {
        let cases = [
            (ErrorCode::NotFound, 404),
            (ErrorCode::Conflict, 409),
            (ErrorCode::InvalidStateTransition, 409),
            (ErrorCode::QuotaExceeded, 422),
            (ErrorCode::InsufficientBudget, 402),
            (ErrorCode::DependencyBlocked, 409),
            (ErrorCode::UpstreamFailure, 502),
            (ErrorCode::ValidationFailed, 400),
            (ErrorCode::Unauthorized, 401),
            (ErrorCode::Forbidden, 403),
            (ErrorCode::DatabaseError, 500),
            (ErrorCode::InternalError, 500),
        ];
        for (code, status) in cases {
            assert_eq!(status_for(code).as_u16(), status, "{}", code);
        }
    }

    #[test]
    fn insufficient_budget_body_carries_amounts() {
        let error = DomainError::insufficient_budget(Money::from_cents(70_000), Money::from_cents(50_000));
        let body = ErrorResponse::from(&error);
        assert_eq!(body.code, "INSUFFICIENT_BUDGET");
        assert_eq!(body.details["remaining_cents"], "50000");
    }

    #[test]
    fn dependents_are_listed() {
        let error = DomainError::dependency_blocked(
            "vpc-1",
            &["subnet:subnet-1".to_string(), "internet_gateway:igw-1".to_string()],
        );
        let body = ErrorResponse::from(&error);
        assert_eq!(
            body.details["dependents"],
            serde_json::json!(["subnet:subnet-1", "internet_gateway:igw-1"])
        );
    }

    #[test]
    fn malformed_path_id_is_a_validation_error() {
        let err = parse_path_id::<crate::domain::foundation::GroupId>("not-a-uuid", "group_id")
            .unwrap_err();
        assert_eq!(err.0.code, ErrorCode::ValidationFailed);
        assert_eq!(err.0.detail("field"), Some("group_id"));
    }

    #[test]
    fn internal_errors_hide_their_message() {
        let response = ApiError(DomainError::database("connection refused to 10.0.0.5")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
