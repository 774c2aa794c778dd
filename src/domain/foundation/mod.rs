//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the provisioning domain.

mod auth;
mod command;
mod errors;
mod ids;
mod money;
mod role;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{GroupId, SessionId, Username, MAX_USERNAME_LENGTH};
pub use money::{Money, UnitPrice};
pub use role::Role;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
