//! Request and response bodies for session endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::groups::BudgetResponse;
use crate::adapters::http::services::ServiceResponse;
use crate::application::handlers::provisioning::{EvaluateCostResult, FinalizeSessionResult};
use crate::domain::catalog::{CloudProvider, ServiceConfig, ServiceType};
use crate::domain::foundation::{GroupId, SessionId, Timestamp};
use crate::domain::provisioning::{CostEstimate, ProvisioningSession, SessionState};

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub provider: CloudProvider,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: SessionId,
    pub username: String,
    pub group_id: GroupId,
    pub provider: CloudProvider,
    pub state: SessionState,
    pub service_type: Option<ServiceType>,
    pub config: Option<ServiceConfig>,
    pub estimate: Option<CostEstimate>,
    pub estimated_cost_cents: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ProvisioningSession> for SessionResponse {
    fn from(session: ProvisioningSession) -> Self {
        Self {
            id: *session.id(),
            username: session.username().to_string(),
            group_id: *session.group_id(),
            provider: session.provider(),
            state: session.state(),
            service_type: session.service_type(),
            config: session.config().cloned(),
            estimate: session.estimate().copied(),
            estimated_cost_cents: session.estimated_cost().cents(),
            created_at: *session.created_at(),
            updated_at: *session.updated_at(),
        }
    }
}

/// Body of a successful (authorized) evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub state: SessionState,
    pub estimated_cost_cents: u64,
    pub remaining_cents: u64,
    /// True when no price was known and the request was authorized anyway.
    pub unestimable: bool,
    pub session: SessionResponse,
}

impl From<EvaluateCostResult> for EvaluationResponse {
    fn from(result: EvaluateCostResult) -> Self {
        Self {
            state: result.state(),
            estimated_cost_cents: result.estimated_cost.cents(),
            remaining_cents: result.remaining.cents(),
            unestimable: result.unestimable,
            session: result.session.into(),
        }
    }
}

/// Reported by an external provisioning flow once the resource exists.
#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub provider_resource_id: String,
    /// Replaces the selected configuration, e.g. with provider-assigned values.
    #[serde(default)]
    pub final_config: Option<ServiceConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub service: ServiceResponse,
    pub budget: BudgetResponse,
}

impl From<FinalizeSessionResult> for FinalizeResponse {
    fn from(result: FinalizeSessionResult) -> Self {
        Self {
            service: result.record.into(),
            budget: result.usage.into(),
        }
    }
}

/// `POST /api/sessions/:id/provision?timeout_secs=...`
#[derive(Debug, Default, Deserialize)]
pub struct ProvisionParams {
    pub timeout_secs: Option<u64>,
}
