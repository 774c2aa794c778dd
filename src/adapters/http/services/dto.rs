//! Request and response bodies for service endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::services::UsageReport;
use crate::domain::catalog::{CloudProvider, ServiceConfig, ServiceType};
use crate::domain::foundation::{GroupId, SessionId, Timestamp, ValidationError};
use crate::domain::registry::{ServiceRecord, ServiceStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub session_id: SessionId,
    pub group_id: GroupId,
    pub username: String,
    pub provider: CloudProvider,
    pub service_type: ServiceType,
    pub config: ServiceConfig,
    pub provider_resource_id: String,
    pub cost_cents: u64,
    pub status: ServiceStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl From<ServiceRecord> for ServiceResponse {
    fn from(record: ServiceRecord) -> Self {
        Self {
            session_id: *record.session_id(),
            group_id: *record.group_id(),
            username: record.username().to_string(),
            provider: record.kind().provider(),
            service_type: record.kind().service_type(),
            config: record.config().clone(),
            provider_resource_id: record.provider_resource_id().to_string(),
            cost_cents: record.cost().cents(),
            status: record.status(),
            created_at: *record.created_at(),
            updated_at: *record.updated_at(),
            deleted_at: record.deleted_at().copied(),
        }
    }
}

/// `GET /api/services?group_id=...&status=active,deleting`
#[derive(Debug, Default, Deserialize)]
pub struct ListServicesParams {
    pub group_id: Option<GroupId>,
    /// Comma-separated statuses; absent means all.
    pub status: Option<String>,
}

impl ListServicesParams {
    /// Parses the status filter.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` for an unknown status
    pub fn statuses(&self) -> Result<Vec<ServiceStatus>, ValidationError> {
        self.status
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

/// `GET /api/services/report?username=...`
#[derive(Debug, Default, Deserialize)]
pub struct UsageReportParams {
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageReportResponse {
    pub username: String,
    pub active_services: usize,
    pub total_cost_cents: u64,
    pub services: Vec<ServiceResponse>,
}

impl From<UsageReport> for UsageReportResponse {
    fn from(report: UsageReport) -> Self {
        Self {
            username: report.username.to_string(),
            active_services: report.active_services,
            total_cost_cents: report.total_cost.cents(),
            services: report.services.into_iter().map(ServiceResponse::from).collect(),
        }
    }
}
