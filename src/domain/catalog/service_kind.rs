//! Cloud providers, service types, and the validated pair of the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ValidationError};

/// A cloud provider the platform can provision against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Gcp,
}

impl CloudProvider {
    /// All supported providers.
    pub const ALL: [CloudProvider; 2] = [CloudProvider::Aws, CloudProvider::Gcp];

    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "gcp" => Ok(CloudProvider::Gcp),
            other => Err(ValidationError::invalid_format(
                "provider",
                format!("unsupported provider '{}'", other),
            )),
        }
    }
}

/// A kind of resource a user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Ec2,
    S3,
    Lambda,
    Rds,
    #[serde(rename = "dynamodb")]
    DynamoDb,
    #[serde(rename = "cloudfront")]
    CloudFront,
    Vpc,
    ComputeEngine,
    CloudStorage,
    Gke,
    #[serde(rename = "bigquery")]
    BigQuery,
    CloudFunctions,
    CloudSql,
}

impl ServiceType {
    /// Every service type, in catalog order.
    pub const ALL: [ServiceType; 13] = [
        ServiceType::Ec2,
        ServiceType::S3,
        ServiceType::Lambda,
        ServiceType::Rds,
        ServiceType::DynamoDb,
        ServiceType::CloudFront,
        ServiceType::Vpc,
        ServiceType::ComputeEngine,
        ServiceType::CloudStorage,
        ServiceType::Gke,
        ServiceType::BigQuery,
        ServiceType::CloudFunctions,
        ServiceType::CloudSql,
    ];

    /// Returns the provider that offers this service.
    pub fn provider(&self) -> CloudProvider {
        match self {
            ServiceType::Ec2
            | ServiceType::S3
            | ServiceType::Lambda
            | ServiceType::Rds
            | ServiceType::DynamoDb
            | ServiceType::CloudFront
            | ServiceType::Vpc => CloudProvider::Aws,
            ServiceType::ComputeEngine
            | ServiceType::CloudStorage
            | ServiceType::Gke
            | ServiceType::BigQuery
            | ServiceType::CloudFunctions
            | ServiceType::CloudSql => CloudProvider::Gcp,
        }
    }

    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Ec2 => "ec2",
            ServiceType::S3 => "s3",
            ServiceType::Lambda => "lambda",
            ServiceType::Rds => "rds",
            ServiceType::DynamoDb => "dynamodb",
            ServiceType::CloudFront => "cloudfront",
            ServiceType::Vpc => "vpc",
            ServiceType::ComputeEngine => "compute_engine",
            ServiceType::CloudStorage => "cloud_storage",
            ServiceType::Gke => "gke",
            ServiceType::BigQuery => "bigquery",
            ServiceType::CloudFunctions => "cloud_functions",
            ServiceType::CloudSql => "cloud_sql",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ServiceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "service_type",
                    format!("unsupported service type '{}'", s.trim()),
                )
            })
    }
}

/// A validated `(provider, service type)` pair.
///
/// This is the key every per-service behavior is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceKind {
    provider: CloudProvider,
    service_type: ServiceType,
}

impl ServiceKind {
    /// Pairs a provider with one of its service types.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the provider does not offer the service type
    pub fn new(provider: CloudProvider, service_type: ServiceType) -> Result<Self, DomainError> {
        if service_type.provider() != provider {
            return Err(DomainError::validation(
                "service_type",
                format!(
                    "Service type {} is not offered by provider {}",
                    service_type, provider
                ),
            ));
        }
        Ok(Self {
            provider,
            service_type,
        })
    }

    /// Builds the kind for a service type, using its own provider.
    pub fn of(service_type: ServiceType) -> Self {
        Self {
            provider: service_type.provider(),
            service_type,
        }
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.service_type)
    }
}

impl FromStr for ServiceKind {
    type Err = DomainError;

    /// Parses the `provider/service_type` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, service_type) = s.split_once('/').ok_or_else(|| {
            DomainError::validation("service", format!("expected provider/service, got '{}'", s))
        })?;
        Self::new(provider.parse()?, service_type.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn every_service_type_parses_from_its_own_name() {
        for service_type in ServiceType::ALL {
            assert_eq!(service_type.as_str().parse::<ServiceType>().unwrap(), service_type);
        }
    }

    #[test]
    fn serde_names_match_as_str() {
        for service_type in ServiceType::ALL {
            let json = serde_json::to_string(&service_type).unwrap();
            assert_eq!(json, format!("\"{}\"", service_type.as_str()));
        }
    }

    #[test]
    fn kind_parses_from_display_form() {
        let kind: ServiceKind = "gcp/cloud_sql".parse().unwrap();
        assert_eq!(kind, ServiceKind::of(ServiceType::CloudSql));
        assert_eq!(kind.to_string().parse::<ServiceKind>().unwrap(), kind);
    }

    #[test]
    fn kind_rejects_cross_provider_pair() {
        let err = "gcp/ec2".parse::<ServiceKind>().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!("ec2".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("AWS".parse::<CloudProvider>().unwrap(), CloudProvider::Aws);
        assert!("azure".parse::<CloudProvider>().is_err());
    }

    #[test]
    fn kind_rejects_mismatched_provider() {
        let err = ServiceKind::new(CloudProvider::Gcp, ServiceType::Ec2).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn kind_accepts_matching_provider() {
        let kind = ServiceKind::new(CloudProvider::Gcp, ServiceType::Gke).unwrap();
        assert_eq!(kind, ServiceKind::of(ServiceType::Gke));
        assert_eq!(kind.to_string(), "gcp/gke");
    }
}
