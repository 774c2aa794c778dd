//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

use super::{AuthError, Money};

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Lookup and uniqueness errors
    NotFound,
    Conflict,
    InvalidStateTransition,

    // Business rule errors
    QuotaExceeded,
    InsufficientBudget,
    DependencyBlocked,

    // Collaborator errors
    UpstreamFailure,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::InsufficientBudget => "INSUFFICIENT_BUDGET",
            ErrorCode::DependencyBlocked => "DEPENDENCY_BLOCKED",
            ErrorCode::UpstreamFailure => "UPSTREAM_FAILURE",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Creates a not-found error naming the missing resource.
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
            .with_detail("resource", resource)
            .with_detail("id", id)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Creates an error for a lifecycle transition that is not legal from the current state.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidStateTransition, message)
    }

    /// Creates a quota error for a manager who owns the maximum number of groups.
    pub fn quota_exceeded(manager: impl fmt::Display, limit: u32) -> Self {
        Self::new(
            ErrorCode::QuotaExceeded,
            format!("Manager {} already owns the maximum of {} groups", manager, limit),
        )
        .with_detail("group_limit", limit.to_string())
    }

    /// Creates an insufficient budget error carrying the amounts involved.
    pub fn insufficient_budget(required: Money, remaining: Money) -> Self {
        Self::new(
            ErrorCode::InsufficientBudget,
            format!(
                "Insufficient budget: {} required, {} remaining",
                required, remaining
            ),
        )
        .with_detail("required_cents", required.cents().to_string())
        .with_detail("remaining_cents", remaining.cents().to_string())
    }

    /// Creates a dependency error naming every blocking dependent.
    pub fn dependency_blocked(resource_id: &str, dependents: &[String]) -> Self {
        Self::new(
            ErrorCode::DependencyBlocked,
            format!(
                "Resource {} has live dependents: {}",
                resource_id,
                dependents.join(", ")
            ),
        )
        .with_detail("resource_id", resource_id)
        .with_detail("dependents", dependents.join(","))
    }

    /// Creates an error for a failed call to an external collaborator.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFailure, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the named detail, if present.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    /// Returns the blocking dependents carried by a `DependencyBlocked` error.
    pub fn dependents(&self) -> Vec<String> {
        self.detail("dependents")
            .map(|list| {
                list.split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::InvalidCredentials => {
                DomainError::unauthorized(err.to_string())
            }
            AuthError::InsufficientPermissions => DomainError::forbidden(err.to_string()),
            AuthError::ServiceUnavailable(_) => DomainError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("username");
        assert_eq!(format!("{}", err), "Field 'username' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("group_limit", 1, 100, 150);
        assert_eq!(
            format!("{}", err),
            "Field 'group_limit' must be between 1 and 100, got 150"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::Conflict, "Group name taken");
        assert_eq!(format!("{}", err), "[CONFLICT] Group name taken");
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError = ValidationError::invalid_format("cidr_block", "bad prefix").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.detail("field"), Some("cidr_block"));
    }

    #[test]
    fn auth_errors_map_to_unauthorized_or_forbidden() {
        let bad_login: DomainError = AuthError::InvalidCredentials.into();
        assert_eq!(bad_login.code, ErrorCode::Unauthorized);
        let wrong_role: DomainError = AuthError::InsufficientPermissions.into();
        assert_eq!(wrong_role.code, ErrorCode::Forbidden);
        let broken: DomainError = AuthError::service_unavailable("rng").into();
        assert_eq!(broken.code, ErrorCode::InternalError);
    }

    #[test]
    fn insufficient_budget_carries_amounts() {
        let err = DomainError::insufficient_budget(Money::from_cents(700), Money::from_cents(500));
        assert_eq!(err.code, ErrorCode::InsufficientBudget);
        assert_eq!(err.detail("required_cents"), Some("700"));
        assert_eq!(err.detail("remaining_cents"), Some("500"));
    }

    #[test]
    fn dependency_blocked_lists_every_dependent() {
        let deps = vec!["igw-1".to_string(), "subnet-2".to_string()];
        let err = DomainError::dependency_blocked("vpc-9", &deps);
        assert_eq!(err.dependents(), deps);
        assert!(err.message.contains("igw-1"));
        assert!(err.message.contains("subnet-2"));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::InsufficientBudget), "INSUFFICIENT_BUDGET");
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }
}
