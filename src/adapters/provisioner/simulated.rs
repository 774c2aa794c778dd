//! Simulated cloud provisioner.
//!
//! Keeps live resources in memory and hands out provider-style
//! identifiers. Each service kind has a driver entry describing how its
//! identifiers look; kinds without an entry cannot be provisioned.
//!
//! Used for local development and tests. Failure and latency can be
//! injected to exercise the dispatch error paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::catalog::{ServiceConfig, ServiceKind, ServiceType};
use crate::domain::foundation::DomainError;
use crate::domain::registry::Dependent;
use crate::ports::Provisioner;

/// How a service's resource identifiers are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdScheme {
    /// Provider-generated id: prefix plus 17 hex digits (`i-`, `vpc-`, `E`).
    Generated(&'static str),
    /// The resource is addressed by the name the user chose.
    Named,
}

/// Per-kind behavior of the simulated cloud.
#[derive(Debug, Clone, Copy)]
struct Driver {
    id_scheme: IdScheme,
    /// Whether sub-resources can attach to this kind.
    composite: bool,
}

fn standard_drivers() -> HashMap<ServiceKind, Driver> {
    use IdScheme::{Generated, Named};

    ServiceType::ALL
        .iter()
        .map(|service_type| {
            let id_scheme = match service_type {
                ServiceType::Ec2 => Generated("i-"),
                ServiceType::Vpc => Generated("vpc-"),
                ServiceType::CloudFront => Generated("E"),
                _ => Named,
            };
            let driver = Driver {
                id_scheme,
                composite: *service_type == ServiceType::Vpc,
            };
            (ServiceKind::of(*service_type), driver)
        })
        .collect()
}

#[derive(Debug, Clone)]
struct LiveResource {
    kind: ServiceKind,
    dependents: Vec<Dependent>,
}

#[derive(Debug, Default)]
struct Cloud {
    resources: HashMap<String, LiveResource>,
    next_serial: u64,
    failing_creates: u32,
    failing_deletes: u32,
}

/// In-memory stand-in for the AWS and GCP APIs.
pub struct SimulatedProvisioner {
    drivers: HashMap<ServiceKind, Driver>,
    cloud: Mutex<Cloud>,
    create_latency: Mutex<Option<Duration>>,
}

impl SimulatedProvisioner {
    pub fn new() -> Self {
        Self {
            drivers: standard_drivers(),
            cloud: Mutex::new(Cloud::default()),
            create_latency: Mutex::new(None),
        }
    }

    // === Test Helpers ===

    /// Makes the next `count` creates fail.
    pub async fn fail_next_creates(&self, count: u32) {
        self.cloud.lock().await.failing_creates = count;
    }

    /// Makes the next `count` deletes fail.
    pub async fn fail_next_deletes(&self, count: u32) {
        self.cloud.lock().await.failing_deletes = count;
    }

    /// Delays every create by `latency`, or removes the delay.
    pub async fn set_create_latency(&self, latency: Option<Duration>) {
        *self.create_latency.lock().await = latency;
    }

    /// Attaches a sub-resource to a live composite resource.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the resource is not live
    /// - `ValidationFailed` if the resource cannot have dependents
    pub async fn attach_dependent(
        &self,
        resource_id: &str,
        dependent: Dependent,
    ) -> Result<(), DomainError> {
        let mut cloud = self.cloud.lock().await;
        let resource = cloud
            .resources
            .get_mut(resource_id)
            .ok_or_else(|| DomainError::not_found("Cloud resource", resource_id))?;
        if !self.driver(resource.kind)?.composite {
            return Err(DomainError::validation(
                "resource_id",
                format!("{} resources cannot have dependents", resource.kind),
            ));
        }
        resource.dependents.push(dependent);
        Ok(())
    }

    /// Detaches every sub-resource from a live resource.
    pub async fn detach_all(&self, resource_id: &str) {
        if let Some(resource) = self.cloud.lock().await.resources.get_mut(resource_id) {
            resource.dependents.clear();
        }
    }

    /// True if the resource exists in the simulated cloud.
    pub async fn is_live(&self, resource_id: &str) -> bool {
        self.cloud.lock().await.resources.contains_key(resource_id)
    }

    /// Number of live resources.
    pub async fn live_count(&self) -> usize {
        self.cloud.lock().await.resources.len()
    }

    fn driver(&self, kind: ServiceKind) -> Result<Driver, DomainError> {
        self.drivers
            .get(&kind)
            .copied()
            .ok_or_else(|| DomainError::upstream(format!("No driver for {}", kind)))
    }
}

impl Default for SimulatedProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provisioner for SimulatedProvisioner {
    async fn create(&self, kind: ServiceKind, config: &ServiceConfig) -> Result<String, DomainError> {
        let driver = self.driver(kind)?;
        if config.service_type() != kind.service_type() {
            return Err(DomainError::upstream(format!(
                "{} rejected a {} configuration",
                kind,
                config.service_type()
            )));
        }

        let latency = *self.create_latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut cloud = self.cloud.lock().await;
        if cloud.failing_creates > 0 {
            cloud.failing_creates -= 1;
            return Err(DomainError::upstream(format!("{} create failed", kind)));
        }

        let resource_id = match driver.id_scheme {
            IdScheme::Generated(prefix) => {
                cloud.next_serial += 1;
                format!("{}{:017x}", prefix, cloud.next_serial)
            }
            IdScheme::Named => config.resource_name().to_string(),
        };
        if cloud.resources.contains_key(&resource_id) {
            return Err(DomainError::upstream(format!(
                "{} '{}' already exists at the provider",
                kind, resource_id
            )));
        }

        cloud.resources.insert(
            resource_id.clone(),
            LiveResource {
                kind,
                dependents: Vec::new(),
            },
        );
        tracing::debug!(%kind, resource_id = %resource_id, "Simulated resource created");
        Ok(resource_id)
    }

    async fn delete(&self, kind: ServiceKind, resource_id: &str) -> Result<(), DomainError> {
        let mut cloud = self.cloud.lock().await;
        if cloud.failing_deletes > 0 {
            cloud.failing_deletes -= 1;
            return Err(DomainError::upstream(format!("{} delete failed", kind)));
        }

        let resource = cloud.resources.get(resource_id).ok_or_else(|| {
            DomainError::upstream(format!("{} '{}' does not exist", kind, resource_id))
        })?;
        if !resource.dependents.is_empty() {
            return Err(DomainError::upstream(format!(
                "{} '{}' has dependent objects",
                kind, resource_id
            )));
        }
        cloud.resources.remove(resource_id);
        tracing::debug!(%kind, resource_id, "Simulated resource deleted");
        Ok(())
    }

    async fn dependents(
        &self,
        kind: ServiceKind,
        resource_id: &str,
    ) -> Result<Vec<Dependent>, DomainError> {
        if !self.driver(kind)?.composite {
            return Ok(Vec::new());
        }
        let cloud = self.cloud.lock().await;
        let resource = cloud.resources.get(resource_id).ok_or_else(|| {
            DomainError::upstream(format!("{} '{}' does not exist", kind, resource_id))
        })?;
        Ok(resource.dependents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn vpc() -> ServiceConfig {
        ServiceConfig::Vpc {
            name: "core".to_string(),
            cidr_block: "10.0.0.0/16".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    fn bucket() -> ServiceConfig {
        ServiceConfig::CloudStorage {
            bucket_name: "team-data".to_string(),
            location: "US".to_string(),
            size_gb: None,
        }
    }

    #[tokio::test]
    async fn generated_ids_use_provider_prefix() {
        let cloud = SimulatedProvisioner::new();
        let id = cloud
            .create(ServiceKind::of(ServiceType::Vpc), &vpc())
            .await
            .unwrap();

        assert!(id.starts_with("vpc-"));
        assert_eq!(id.len(), 4 + 17);
        assert!(cloud.is_live(&id).await);
    }

    #[tokio::test]
    async fn named_resources_cannot_be_created_twice() {
        let cloud = SimulatedProvisioner::new();
        let kind = ServiceKind::of(ServiceType::CloudStorage);
        let id = cloud.create(kind, &bucket()).await.unwrap();
        assert_eq!(id, "team-data");

        let err = cloud.create(kind, &bucket()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamFailure);
    }

    #[tokio::test]
    async fn injected_create_failure_is_consumed() {
        let cloud = SimulatedProvisioner::new();
        let kind = ServiceKind::of(ServiceType::CloudStorage);
        cloud.fail_next_creates(1).await;

        assert!(cloud.create(kind, &bucket()).await.is_err());
        assert!(cloud.create(kind, &bucket()).await.is_ok());
    }

    #[tokio::test]
    async fn composite_resource_reports_dependents() {
        let cloud = SimulatedProvisioner::new();
        let kind = ServiceKind::of(ServiceType::Vpc);
        let id = cloud.create(kind, &vpc()).await.unwrap();
        cloud
            .attach_dependent(&id, Dependent::new("subnet", "subnet-1"))
            .await
            .unwrap();

        let dependents = cloud.dependents(kind, &id).await.unwrap();
        assert_eq!(dependents, vec![Dependent::new("subnet", "subnet-1")]);

        let err = cloud.delete(kind, &id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamFailure);
        assert!(cloud.is_live(&id).await);
    }

    #[tokio::test]
    async fn plain_resources_have_no_dependents() {
        let cloud = SimulatedProvisioner::new();
        let kind = ServiceKind::of(ServiceType::CloudStorage);
        let id = cloud.create(kind, &bucket()).await.unwrap();

        assert!(cloud.dependents(kind, &id).await.unwrap().is_empty());
        let err = cloud
            .attach_dependent(&id, Dependent::new("acl", "a"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn delete_removes_resource() {
        let cloud = SimulatedProvisioner::new();
        let kind = ServiceKind::of(ServiceType::CloudStorage);
        let id = cloud.create(kind, &bucket()).await.unwrap();

        cloud.delete(kind, &id).await.unwrap();

        assert_eq!(cloud.live_count().await, 0);
        assert!(cloud.delete(kind, &id).await.is_err());
    }
}
