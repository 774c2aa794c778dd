//! Service catalog: per-service behavior keyed by `(provider, service type)`.
//!
//! Everything that differs between services (how cost is modeled, which
//! field identifies the created resource, whether it can have dependents)
//! is looked up here instead of being switched on at each call site.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{CloudProvider, ServiceConfig, ServiceKind, ServiceType};

/// Hours in the quarterly billing horizon (24 hours x 90 days).
pub const HOURS_PER_QUARTER: u64 = 24 * 90;

/// Months in the quarterly billing horizon.
pub const MONTHS_PER_QUARTER: u64 = 3;

/// Storage size assumed when a request does not state one (1 TB).
pub const DEFAULT_STORAGE_GB: u64 = 1024;

/// How a service's unit price turns into a quarterly estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    /// Unit price is per instance-hour.
    Hourly,
    /// Unit price is per GB-month.
    StorageMonthly,
}

impl PricingModel {
    /// Number of billing units charged over the horizon for this config.
    pub fn billable_units(&self, config: &ServiceConfig) -> u64 {
        match self {
            PricingModel::Hourly => HOURS_PER_QUARTER,
            PricingModel::StorageMonthly => config
                .storage_size_gb()
                .unwrap_or(DEFAULT_STORAGE_GB)
                .saturating_mul(MONTHS_PER_QUARTER),
        }
    }
}

/// Static description of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub kind: ServiceKind,
    pub display_name: &'static str,
    /// `None` means the service is unestimable and always authorized.
    pub pricing: Option<PricingModel>,
    /// Name of the provider field that identifies a created resource.
    pub identifier_field: &'static str,
    /// True for resources that can have live dependents attached.
    pub composite: bool,
}

/// Registry of every service the platform can provision.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    entries: BTreeMap<ServiceKind, ServiceDescriptor>,
}

impl ServiceCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The catalog of services offered on AWS and GCP.
    pub fn standard() -> Self {
        use PricingModel::{Hourly, StorageMonthly};

        let entries: [(ServiceType, &'static str, Option<PricingModel>, &'static str, bool); 13] = [
            (ServiceType::Ec2, "Amazon EC2 (Elastic Compute Cloud)", Some(Hourly), "instance_id", false),
            (ServiceType::S3, "Amazon S3 (Simple Storage Service)", Some(StorageMonthly), "bucket_name", false),
            (ServiceType::Lambda, "AWS Lambda", None, "function_name", false),
            (ServiceType::Rds, "Amazon RDS (Relational Database Service)", Some(Hourly), "db_instance_identifier", false),
            (ServiceType::DynamoDb, "Amazon DynamoDB", None, "table_name", false),
            (ServiceType::CloudFront, "Amazon CloudFront", None, "distribution_id", false),
            (ServiceType::Vpc, "Amazon VPC (Virtual Private Cloud)", None, "vpc_id", true),
            (ServiceType::ComputeEngine, "Google Compute Engine", Some(Hourly), "instance_name", false),
            (ServiceType::CloudStorage, "Google Cloud Storage", Some(StorageMonthly), "bucket_name", false),
            (ServiceType::Gke, "Google Kubernetes Engine (GKE)", None, "cluster_name", false),
            (ServiceType::BigQuery, "BigQuery", None, "dataset_id", false),
            (ServiceType::CloudFunctions, "Cloud Functions", None, "function_name", false),
            (ServiceType::CloudSql, "Cloud SQL", Some(Hourly), "instance_name", false),
        ];

        let mut catalog = Self::empty();
        for (service_type, display_name, pricing, identifier_field, composite) in entries {
            catalog.register(ServiceDescriptor {
                kind: ServiceKind::of(service_type),
                display_name,
                pricing,
                identifier_field,
                composite,
            });
        }
        catalog
    }

    /// Adds or replaces an entry.
    pub fn register(&mut self, descriptor: ServiceDescriptor) {
        self.entries.insert(descriptor.kind, descriptor);
    }

    /// Looks up the descriptor for a service kind.
    pub fn descriptor(&self, kind: &ServiceKind) -> Option<&ServiceDescriptor> {
        self.entries.get(kind)
    }

    /// Lists the services offered by a provider, in catalog order.
    pub fn services_for(&self, provider: CloudProvider) -> Vec<&ServiceDescriptor> {
        self.entries
            .values()
            .filter(|d| d.kind.provider() == provider)
            .collect()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
