//! Typed per-service configuration payloads.
//!
//! Each `(provider, service type)` pair has its own variant, tagged on the
//! wire by `service_type`. Payloads are validated at the boundary with
//! [`ServiceConfig::validate`] before a session ever stores them.

use serde::{Deserialize, Serialize};

use super::ServiceType;
use crate::domain::foundation::ValidationError;

/// Minimum and maximum RDS storage allocation in GB.
const RDS_STORAGE_GB: (i64, i64) = (20, 65_536);

/// Upper bound on requested storage sizes in GB.
const MAX_STORAGE_GB: i64 = 1_048_576;

/// Configuration for one requested resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service_type", rename_all = "snake_case")]
pub enum ServiceConfig {
    Ec2 {
        instance_name: String,
        instance_type: String,
        ami_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subnet_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        security_group_id: Option<String>,
    },
    S3 {
        bucket_name: String,
        region: String,
        #[serde(default)]
        versioning: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size_gb: Option<u64>,
    },
    Lambda {
        function_name: String,
        runtime: String,
        handler: String,
        region: String,
        #[serde(default = "default_lambda_memory_mb")]
        memory_mb: u32,
    },
    Rds {
        db_instance_identifier: String,
        db_instance_class: String,
        engine: String,
        allocated_storage_gb: u32,
        master_username: String,
    },
    #[serde(rename = "dynamodb")]
    DynamoDb {
        table_name: String,
        region: String,
        partition_key: String,
        read_capacity: u32,
        write_capacity: u32,
    },
    #[serde(rename = "cloudfront")]
    CloudFront {
        origin_domain_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
        #[serde(default)]
        min_ttl: u64,
    },
    Vpc {
        name: String,
        cidr_block: String,
        region: String,
    },
    ComputeEngine {
        instance_name: String,
        zone: String,
        machine_type: String,
        image_project: String,
        image_family: String,
    },
    CloudStorage {
        bucket_name: String,
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size_gb: Option<u64>,
    },
    Gke {
        cluster_name: String,
        zone: String,
        machine_type: String,
        node_count: u32,
    },
    #[serde(rename = "bigquery")]
    BigQuery { dataset_id: String, location: String },
    CloudFunctions {
        function_name: String,
        region: String,
        runtime: String,
        entry_point: String,
    },
    CloudSql {
        instance_name: String,
        region: String,
        tier: String,
        database_version: String,
    },
}

fn default_lambda_memory_mb() -> u32 {
    128
}

impl ServiceConfig {
    /// Returns the service type this payload configures.
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceConfig::Ec2 { .. } => ServiceType::Ec2,
            ServiceConfig::S3 { .. } => ServiceType::S3,
            ServiceConfig::Lambda { .. } => ServiceType::Lambda,
            ServiceConfig::Rds { .. } => ServiceType::Rds,
            ServiceConfig::DynamoDb { .. } => ServiceType::DynamoDb,
            ServiceConfig::CloudFront { .. } => ServiceType::CloudFront,
            ServiceConfig::Vpc { .. } => ServiceType::Vpc,
            ServiceConfig::ComputeEngine { .. } => ServiceType::ComputeEngine,
            ServiceConfig::CloudStorage { .. } => ServiceType::CloudStorage,
            ServiceConfig::Gke { .. } => ServiceType::Gke,
            ServiceConfig::BigQuery { .. } => ServiceType::BigQuery,
            ServiceConfig::CloudFunctions { .. } => ServiceType::CloudFunctions,
            ServiceConfig::CloudSql { .. } => ServiceType::CloudSql,
        }
    }

    /// Name the user asked for; used to label the created resource.
    pub fn resource_name(&self) -> &str {
        match self {
            ServiceConfig::Ec2 { instance_name, .. } => instance_name,
            ServiceConfig::S3 { bucket_name, .. } => bucket_name,
            ServiceConfig::Lambda { function_name, .. } => function_name,
            ServiceConfig::Rds {
                db_instance_identifier,
                ..
            } => db_instance_identifier,
            ServiceConfig::DynamoDb { table_name, .. } => table_name,
            ServiceConfig::CloudFront {
                origin_domain_name, ..
            } => origin_domain_name,
            ServiceConfig::Vpc { name, .. } => name,
            ServiceConfig::ComputeEngine { instance_name, .. } => instance_name,
            ServiceConfig::CloudStorage { bucket_name, .. } => bucket_name,
            ServiceConfig::Gke { cluster_name, .. } => cluster_name,
            ServiceConfig::BigQuery { dataset_id, .. } => dataset_id,
            ServiceConfig::CloudFunctions { function_name, .. } => function_name,
            ServiceConfig::CloudSql { instance_name, .. } => instance_name,
        }
    }

    /// Requested storage size for storage services, if given.
    pub fn storage_size_gb(&self) -> Option<u64> {
        match self {
            ServiceConfig::S3 { size_gb, .. } | ServiceConfig::CloudStorage { size_gb, .. } => {
                *size_gb
            }
            _ => None,
        }
    }

    /// Validates the payload's fields.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for a blank required field
    /// - `OutOfRange` for numeric limits
    /// - `InvalidFormat` for malformed names or CIDR blocks
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ServiceConfig::Ec2 {
                instance_name,
                instance_type,
                ami_id,
                ..
            } => {
                required("instance_name", instance_name)?;
                required("instance_type", instance_type)?;
                required("ami_id", ami_id)?;
                if !ami_id.starts_with("ami-") {
                    return Err(ValidationError::invalid_format(
                        "ami_id",
                        "must start with 'ami-'",
                    ));
                }
                Ok(())
            }
            ServiceConfig::S3 {
                bucket_name,
                region,
                size_gb,
                ..
            } => {
                bucket(bucket_name)?;
                required("region", region)?;
                storage_size(size_gb)
            }
            ServiceConfig::Lambda {
                function_name,
                runtime,
                handler,
                region,
                memory_mb,
            } => {
                required("function_name", function_name)?;
                required("runtime", runtime)?;
                required("handler", handler)?;
                required("region", region)?;
                in_range("memory_mb", 128, 10_240, *memory_mb as i64)
            }
            ServiceConfig::Rds {
                db_instance_identifier,
                db_instance_class,
                engine,
                allocated_storage_gb,
                master_username,
            } => {
                required("db_instance_identifier", db_instance_identifier)?;
                required("db_instance_class", db_instance_class)?;
                required("engine", engine)?;
                required("master_username", master_username)?;
                in_range(
                    "allocated_storage_gb",
                    RDS_STORAGE_GB.0,
                    RDS_STORAGE_GB.1,
                    *allocated_storage_gb as i64,
                )
            }
            ServiceConfig::DynamoDb {
                table_name,
                region,
                partition_key,
                read_capacity,
                write_capacity,
            } => {
                required("table_name", table_name)?;
                required("region", region)?;
                required("partition_key", partition_key)?;
                in_range("read_capacity", 1, 40_000, *read_capacity as i64)?;
                in_range("write_capacity", 1, 40_000, *write_capacity as i64)
            }
            ServiceConfig::CloudFront {
                origin_domain_name,
                ..
            } => {
                required("origin_domain_name", origin_domain_name)?;
                if !origin_domain_name.contains('.') {
                    return Err(ValidationError::invalid_format(
                        "origin_domain_name",
                        "must be a fully qualified domain name",
                    ));
                }
                Ok(())
            }
            ServiceConfig::Vpc {
                name,
                cidr_block,
                region,
            } => {
                required("name", name)?;
                required("region", region)?;
                cidr(cidr_block)
            }
            ServiceConfig::ComputeEngine {
                instance_name,
                zone,
                machine_type,
                image_project,
                image_family,
            } => {
                required("instance_name", instance_name)?;
                required("zone", zone)?;
                required("machine_type", machine_type)?;
                required("image_project", image_project)?;
                required("image_family", image_family)
            }
            ServiceConfig::CloudStorage {
                bucket_name,
                location,
                size_gb,
            } => {
                bucket(bucket_name)?;
                required("location", location)?;
                storage_size(size_gb)
            }
            ServiceConfig::Gke {
                cluster_name,
                zone,
                machine_type,
                node_count,
            } => {
                required("cluster_name", cluster_name)?;
                required("zone", zone)?;
                required("machine_type", machine_type)?;
                in_range("node_count", 1, 100, *node_count as i64)
            }
            ServiceConfig::BigQuery {
                dataset_id,
                location,
            } => {
                required("dataset_id", dataset_id)?;
                required("location", location)
            }
            ServiceConfig::CloudFunctions {
                function_name,
                region,
                runtime,
                entry_point,
            } => {
                required("function_name", function_name)?;
                required("region", region)?;
                required("runtime", runtime)?;
                required("entry_point", entry_point)
            }
            ServiceConfig::CloudSql {
                instance_name,
                region,
                tier,
                database_version,
            } => {
                required("instance_name", instance_name)?;
                required("region", region)?;
                required("tier", tier)?;
                required("database_version", database_version)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field checks
// ─────────────────────────────────────────────────────────────────────────────

fn required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}

fn in_range(field: &str, min: i64, max: i64, actual: i64) -> Result<(), ValidationError> {
    if actual < min || actual > max {
        return Err(ValidationError::out_of_range(field, min, max, actual));
    }
    Ok(())
}

fn storage_size(size_gb: &Option<u64>) -> Result<(), ValidationError> {
    match size_gb {
        Some(size) => in_range(
            "size_gb",
            1,
            MAX_STORAGE_GB,
            i64::try_from(*size).unwrap_or(i64::MAX),
        ),
        None => Ok(()),
    }
}

/// Bucket names: 3-63 chars of lowercase letters, digits, '.' and '-',
/// starting and ending with a letter or digit.
fn bucket(name: &str) -> Result<(), ValidationError> {
    required("bucket_name", name)?;
    in_range("bucket_name", 3, 63, name.len() as i64)?;
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let edges_ok = name
        .chars()
        .next()
        .zip(name.chars().last())
        .map(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric())
        .unwrap_or(false);
    if !allowed || !edges_ok {
        return Err(ValidationError::invalid_format(
            "bucket_name",
            "use lowercase letters, digits, '.' and '-', starting and ending alphanumeric",
        ));
    }
    Ok(())
}

/// IPv4 CIDR with a prefix between /16 and /28.
fn cidr(block: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::invalid_format("cidr_block", "expected a.b.c.d/prefix");
    let (address, prefix) = block.trim().split_once('/').ok_or_else(invalid)?;
    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() != 4 || octets.iter().any(|o| o.parse::<u8>().is_err()) {
        return Err(invalid());
    }
    let prefix: i64 = prefix.parse().map_err(|_| invalid())?;
    in_range("cidr_block", 16, 28, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vpc(cidr_block: &str) -> ServiceConfig {
        ServiceConfig::Vpc {
            name: "core-net".to_string(),
            cidr_block: cidr_block.to_string(),
            region: "us-east-1".to_string(),
        }
    }

    #[test]
    fn deserializes_from_tagged_json() {
        let config: ServiceConfig = serde_json::from_value(json!({
            "service_type": "ec2",
            "instance_name": "build-box",
            "instance_type": "t3.micro",
            "ami_id": "ami-0abc"
        }))
        .unwrap();

        assert_eq!(config.service_type(), ServiceType::Ec2);
        assert_eq!(config.resource_name(), "build-box");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tag_matches_service_type_name_for_renamed_variants() {
        let config = ServiceConfig::DynamoDb {
            table_name: "orders".to_string(),
            region: "us-east-1".to_string(),
            partition_key: "id".to_string(),
            read_capacity: 5,
            write_capacity: 5,
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["service_type"], config.service_type().as_str());
    }

    #[test]
    fn unknown_fields_for_wrong_variant_fail_to_parse() {
        let result = serde_json::from_value::<ServiceConfig>(json!({
            "service_type": "s3",
            "instance_name": "oops"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn lambda_memory_defaults() {
        let config: ServiceConfig = serde_json::from_value(json!({
            "service_type": "lambda",
            "function_name": "resize",
            "runtime": "python3.12",
            "handler": "main.handler",
            "region": "us-east-1"
        }))
        .unwrap();
        match config {
            ServiceConfig::Lambda { memory_mb, .. } => assert_eq!(memory_mb, 128),
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn rejects_blank_required_field() {
        let config = ServiceConfig::BigQuery {
            dataset_id: " ".to_string(),
            location: "US".to_string(),
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::empty_field("dataset_id"))
        );
    }

    #[test]
    fn rejects_bad_bucket_names() {
        let config = ServiceConfig::S3 {
            bucket_name: "Upper_Case".to_string(),
            region: "us-east-1".to_string(),
            versioning: false,
            size_gb: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validates_cidr_blocks() {
        assert!(vpc("10.0.0.0/16").validate().is_ok());
        assert!(vpc("10.0.0.0/8").validate().is_err());
        assert!(vpc("10.0.0/16").validate().is_err());
        assert!(vpc("10.0.0.300/16").validate().is_err());
        assert!(vpc("10.0.0.0").validate().is_err());
    }

    #[test]
    fn rds_storage_must_be_in_range() {
        let config = ServiceConfig::Rds {
            db_instance_identifier: "orders-db".to_string(),
            db_instance_class: "db.t3.micro".to_string(),
            engine: "postgres".to_string(),
            allocated_storage_gb: 5,
            master_username: "admin".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn storage_size_only_reported_for_storage_services() {
        let storage = ServiceConfig::CloudStorage {
            bucket_name: "team-archive".to_string(),
            location: "US".to_string(),
            size_gb: Some(50),
        };
        assert_eq!(storage.storage_size_gb(), Some(50));
        assert_eq!(vpc("10.0.0.0/16").storage_size_gb(), None);
    }
}
