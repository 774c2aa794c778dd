//! Command infrastructure for application services.
//!
//! `CommandMetadata` is the context that flows through every mutating call:
//! who is acting, in which role, and which request the call belongs to.
//! Services use it for authorization checks and for tracing fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Role, Username};

/// Metadata context for application commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The account executing this command.
    pub actor: Username,

    /// Role the actor authenticated with.
    pub role: Role,

    /// Links related operations across a single request.
    /// Generated lazily if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "bootstrap", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for an actor.
    pub fn new(actor: Username, role: Role) -> Self {
        Self {
            actor,
            role,
            correlation_id: None,
            source: None,
        }
    }

    /// Sets the correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Sets the command source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if absent.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the command source, if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Username {
        Username::new("dave").unwrap()
    }

    #[test]
    fn keeps_explicit_correlation_id() {
        let meta = CommandMetadata::new(actor(), Role::User).with_correlation_id("req-1");
        assert_eq!(meta.correlation_id(), "req-1");
    }

    #[test]
    fn generates_correlation_id_when_missing() {
        let meta = CommandMetadata::new(actor(), Role::User);
        assert!(!meta.correlation_id().is_empty());
    }

    #[test]
    fn source_is_optional() {
        let meta = CommandMetadata::new(actor(), Role::Admin);
        assert_eq!(meta.source(), None);
        assert_eq!(meta.with_source("api").source(), Some("api"));
    }
}
