//! Provisioner port - the external cloud API.
//!
//! Calls are remote, slow, non-idempotent and non-transactional. Callers
//! bound them with a timeout and never retry them automatically.

use crate::domain::catalog::{ServiceConfig, ServiceKind};
use crate::domain::foundation::DomainError;
use crate::domain::registry::Dependent;
use async_trait::async_trait;

/// Port for creating and deleting live cloud resources.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create a resource and return its provider identifier.
    ///
    /// # Errors
    ///
    /// - `UpstreamFailure` if the provider call fails
    async fn create(&self, kind: ServiceKind, config: &ServiceConfig) -> Result<String, DomainError>;

    /// Delete a resource.
    ///
    /// # Errors
    ///
    /// - `UpstreamFailure` if the provider call fails
    async fn delete(&self, kind: ServiceKind, resource_id: &str) -> Result<(), DomainError>;

    /// List live sub-resources that would block deleting `resource_id`.
    ///
    /// Returns an empty list for services that cannot have dependents.
    ///
    /// # Errors
    ///
    /// - `UpstreamFailure` if the provider call fails
    async fn dependents(
        &self,
        kind: ServiceKind,
        resource_id: &str,
    ) -> Result<Vec<Dependent>, DomainError>;
}
