//! ProvisioningDispatcher - bounded calls to the external provisioner.
//!
//! Every call runs under a timeout. Calls are never retried here; a
//! timed-out create may still complete at the provider, which the
//! caller sees as an orphaned resource.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::catalog::{ServiceConfig, ServiceKind};
use crate::domain::foundation::DomainError;
use crate::domain::registry::Dependent;
use crate::ports::Provisioner;

/// Default bound on a single provisioner call.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout-bounded front for a [`Provisioner`].
pub struct ProvisioningDispatcher {
    provisioner: Arc<dyn Provisioner>,
    timeout: Duration,
}

impl ProvisioningDispatcher {
    pub fn new(provisioner: Arc<dyn Provisioner>, timeout: Duration) -> Self {
        Self {
            provisioner,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates the resource with the default timeout.
    ///
    /// # Errors
    ///
    /// - `UpstreamFailure` if the provisioner fails or does not answer in time
    pub async fn create(
        &self,
        kind: ServiceKind,
        config: &ServiceConfig,
    ) -> Result<String, DomainError> {
        self.create_within(kind, config, self.timeout).await
    }

    /// Creates the resource with a caller-supplied timeout.
    pub async fn create_within(
        &self,
        kind: ServiceKind,
        config: &ServiceConfig,
        timeout: Duration,
    ) -> Result<String, DomainError> {
        let resource_id =
            bounded(timeout, "create", kind, self.provisioner.create(kind, config)).await?;
        tracing::info!(%kind, resource_id = %resource_id, "Resource created");
        Ok(resource_id)
    }

    /// Tears the resource down.
    pub async fn delete(&self, kind: ServiceKind, resource_id: &str) -> Result<(), DomainError> {
        bounded(
            self.timeout,
            "delete",
            kind,
            self.provisioner.delete(kind, resource_id),
        )
        .await?;
        tracing::info!(%kind, resource_id, "Resource deleted");
        Ok(())
    }

    /// Lists what still hangs off a composite resource.
    pub async fn dependents(
        &self,
        kind: ServiceKind,
        resource_id: &str,
    ) -> Result<Vec<Dependent>, DomainError> {
        bounded(
            self.timeout,
            "list dependents of",
            kind,
            self.provisioner.dependents(kind, resource_id),
        )
        .await
    }
}

async fn bounded<T>(
    timeout: Duration,
    action: &str,
    kind: ServiceKind,
    call: impl std::future::Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(|e| {
            tracing::warn!(%kind, error = %e, "Provisioner failed to {} resource", action);
            e
        }),
        Err(_) => {
            tracing::warn!(%kind, timeout_ms = timeout.as_millis() as u64, "Provisioner timed out");
            Err(DomainError::upstream(format!(
                "Provisioner did not {} {} resource within {:?}",
                action, kind, timeout
            )))
        }
    }
}
