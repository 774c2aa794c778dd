//! Service record aggregate.
//!
//! The durable trace of a provisioned resource. One record exists per
//! finalized session and is keyed by that session's id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::catalog::{ServiceConfig, ServiceKind};
use crate::domain::foundation::{
    DomainError, GroupId, Money, SessionId, StateMachine, Timestamp, Username, ValidationError,
};

/// Lifecycle of a provisioned resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Active,
    Deleting,
    Deleted,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Active => "active",
            ServiceStatus::Deleting => "deleting",
            ServiceStatus::Deleted => "deleted",
        }
    }

    /// True for records whose resource may still exist at the provider.
    pub fn is_live(&self) -> bool {
        !matches!(self, ServiceStatus::Deleted)
    }
}

impl StateMachine for ServiceStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (ServiceStatus::Active, ServiceStatus::Deleting)
                | (ServiceStatus::Deleting, ServiceStatus::Deleted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ServiceStatus::Active => vec![ServiceStatus::Deleting],
            ServiceStatus::Deleting => vec![ServiceStatus::Deleted],
            ServiceStatus::Deleted => vec![],
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ServiceStatus::Active),
            "deleting" => Ok(ServiceStatus::Deleting),
            "deleted" => Ok(ServiceStatus::Deleted),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown service status '{}'", other),
            )),
        }
    }
}

/// Durable record of a provisioned resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    session_id: SessionId,
    group_id: GroupId,
    username: Username,
    kind: ServiceKind,
    config: ServiceConfig,
    provider_resource_id: String,
    cost: Money,
    status: ServiceStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
    deleted_at: Option<Timestamp>,
}

impl ServiceRecord {
    /// Creates an active record.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the resource id is blank or the config is for another service
    pub fn activate(
        session_id: SessionId,
        group_id: GroupId,
        username: Username,
        kind: ServiceKind,
        config: ServiceConfig,
        provider_resource_id: &str,
        cost: Money,
    ) -> Result<Self, DomainError> {
        let provider_resource_id = provider_resource_id.trim();
        if provider_resource_id.is_empty() {
            return Err(ValidationError::empty_field("provider_resource_id").into());
        }
        if config.service_type() != kind.service_type() {
            return Err(DomainError::validation(
                "config",
                format!(
                    "Configuration is for {} but the service is {}",
                    config.service_type(),
                    kind.service_type()
                ),
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            session_id,
            group_id,
            username,
            kind,
            config,
            provider_resource_id: provider_resource_id.to_string(),
            cost,
            status: ServiceStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Reconstitute a record from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        session_id: SessionId,
        group_id: GroupId,
        username: Username,
        kind: ServiceKind,
        config: ServiceConfig,
        provider_resource_id: String,
        cost: Money,
        status: ServiceStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
        deleted_at: Option<Timestamp>,
    ) -> Self {
        Self {
            session_id,
            group_id,
            username,
            kind,
            config,
            provider_resource_id,
            cost,
            status,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn provider_resource_id(&self) -> &str {
        &self.provider_resource_id
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn deleted_at(&self) -> Option<&Timestamp> {
        self.deleted_at.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Deletion workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves the record to `Deleting`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the record is `Active`
    pub fn mark_deleting(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ServiceStatus::Deleting)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Moves the record to `Deleted`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the record is `Deleting`
    pub fn mark_deleted(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ServiceStatus::Deleted)?;
        let now = Timestamp::now();
        self.updated_at = now;
        self.deleted_at = Some(now);
        Ok(())
    }
}

/// A live sub-resource attached to a composite resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependent {
    /// What kind of sub-resource this is (e.g. `internet_gateway`).
    pub kind: String,
    /// Provider identifier of the sub-resource.
    pub id: String,
}

impl Dependent {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ServiceType;
    use crate::domain::foundation::ErrorCode;

    fn vpc_config() -> ServiceConfig {
        ServiceConfig::Vpc {
            name: "core".to_string(),
            cidr_block: "10.0.0.0/16".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    fn record() -> ServiceRecord {
        ServiceRecord::activate(
            SessionId::new(),
            GroupId::new(),
            Username::new("alice").unwrap(),
            ServiceKind::of(ServiceType::Vpc),
            vpc_config(),
            "vpc-123",
            Money::ZERO,
        )
        .unwrap()
    }

    #[test]
    fn activate_starts_active() {
        let r = record();
        assert_eq!(r.status(), ServiceStatus::Active);
        assert!(r.deleted_at().is_none());
    }

    #[test]
    fn activate_rejects_blank_resource_id() {
        let err = ServiceRecord::activate(
            SessionId::new(),
            GroupId::new(),
            Username::new("alice").unwrap(),
            ServiceKind::of(ServiceType::Vpc),
            vpc_config(),
            "  ",
            Money::ZERO,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn activate_rejects_config_for_other_service() {
        let err = ServiceRecord::activate(
            SessionId::new(),
            GroupId::new(),
            Username::new("alice").unwrap(),
            ServiceKind::of(ServiceType::Ec2),
            vpc_config(),
            "i-1",
            Money::ZERO,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn deletion_moves_through_deleting() {
        let mut r = record();
        assert!(r.mark_deleted().is_err());
        r.mark_deleting().unwrap();
        assert_eq!(r.status(), ServiceStatus::Deleting);
        r.mark_deleted().unwrap();
        assert_eq!(r.status(), ServiceStatus::Deleted);
        assert!(r.deleted_at().is_some());
        assert!(!r.status().is_live());
    }

    #[test]
    fn dependent_displays_kind_and_id() {
        assert_eq!(
            Dependent::new("subnet", "subnet-7").to_string(),
            "subnet subnet-7"
        );
    }
}
