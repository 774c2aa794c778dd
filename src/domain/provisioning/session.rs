//! Provisioning session aggregate.
//!
//! A session is one user's in-flight request for one resource. It moves
//! forward through [`SessionState`] and ends either as a service record
//! (finalized) or deleted (abandoned after denial).

use serde::{Deserialize, Serialize};

use super::{CostEstimate, SessionState};
use crate::domain::catalog::{CloudProvider, ServiceConfig, ServiceKind, ServiceType};
use crate::domain::foundation::{
    DomainError, GroupId, Money, SessionId, StateMachine, Timestamp, Username,
};
use crate::domain::registry::ServiceRecord;

/// Provisioning session aggregate.
///
/// # Invariants
///
/// - `config` is present from `Configured` onwards and matches the provider
/// - `estimate` is present from `Authorized`/`Denied` onwards
/// - state only moves forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningSession {
    id: SessionId,
    username: Username,
    group_id: GroupId,
    provider: CloudProvider,
    config: Option<ServiceConfig>,
    state: SessionState,
    estimate: Option<CostEstimate>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ProvisioningSession {
    /// Opens a session for `username`, charged to `group_id`.
    pub fn open(username: Username, group_id: GroupId, provider: CloudProvider) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            username,
            group_id,
            provider,
            config: None,
            state: SessionState::Open,
            estimate: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        username: Username,
        group_id: GroupId,
        provider: CloudProvider,
        config: Option<ServiceConfig>,
        state: SessionState,
        estimate: Option<CostEstimate>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            username,
            group_id,
            provider,
            config,
            state,
            estimate,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.config.as_ref().map(ServiceConfig::service_type)
    }

    /// The `(provider, service type)` pair, once a service is selected.
    pub fn kind(&self) -> Option<ServiceKind> {
        self.service_type().map(ServiceKind::of)
    }

    pub fn config(&self) -> Option<&ServiceConfig> {
        self.config.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn estimate(&self) -> Option<&CostEstimate> {
        self.estimate.as_ref()
    }

    /// Estimated cost, zero until evaluated.
    pub fn estimated_cost(&self) -> Money {
        self.estimate
            .as_ref()
            .map(CostEstimate::amount)
            .unwrap_or(Money::ZERO)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that `username` owns this session.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if another user owns it
    pub fn authorize(&self, username: &Username) -> Result<(), DomainError> {
        if &self.username == username {
            Ok(())
        } else {
            Err(DomainError::forbidden(
                "User is not authorized to access this session",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Chooses the service to provision.
    ///
    /// Allowed while `Open`, and again while still `Configured` (which
    /// replaces the earlier choice without leaving the state).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session is already past `Configured`
    /// - `ValidationFailed` if the service is not offered by the session's
    ///   provider or the config is invalid
    pub fn select_service(&mut self, config: ServiceConfig) -> Result<(), DomainError> {
        if !matches!(self.state, SessionState::Open | SessionState::Configured) {
            return Err(DomainError::not_found("Configurable session", self.id)
                .with_detail("state", self.state.as_str()));
        }
        ServiceKind::new(self.provider, config.service_type())?;
        config.validate()?;

        if self.state == SessionState::Open {
            self.state = self.state.transition_to(SessionState::Configured)?;
        }
        self.config = Some(config);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records the estimate and applies the authorization gate.
    ///
    /// Returns the resulting state: `Authorized` if the estimate fits in
    /// `remaining` (always, when unestimable), otherwise `Denied`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Configured`
    pub fn record_estimate(
        &mut self,
        estimate: CostEstimate,
        remaining: Money,
    ) -> Result<SessionState, DomainError> {
        let target = if estimate.fits_within(remaining) {
            SessionState::Authorized
        } else {
            SessionState::Denied
        };
        self.state = self.state.transition_to(target)?;
        self.estimate = Some(estimate);
        self.updated_at = Timestamp::now();
        Ok(self.state)
    }

    /// Checks that the session may be finalized.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Authorized`
    pub fn ensure_authorized(&self) -> Result<(), DomainError> {
        if self.state != SessionState::Authorized {
            return Err(DomainError::invalid_state(format!(
                "Session {} is {}, only authorized sessions can be provisioned",
                self.id, self.state
            )));
        }
        Ok(())
    }

    /// Turns the session into its service record and marks it `Finalized`.
    ///
    /// `final_config` replaces the selected config when the provisioner
    /// reported extra details; it must be for the same service.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Authorized`
    /// - `ValidationFailed` for a blank resource id or mismatched config
    pub fn finalize(
        &mut self,
        provider_resource_id: &str,
        final_config: Option<ServiceConfig>,
    ) -> Result<ServiceRecord, DomainError> {
        self.ensure_authorized()?;
        let selected = self
            .config
            .clone()
            .ok_or_else(|| DomainError::internal("Authorized session has no configuration"))?;
        let kind = ServiceKind::of(selected.service_type());
        let config = match final_config {
            Some(config) => {
                if config.service_type() != selected.service_type() {
                    return Err(DomainError::validation(
                        "final_config",
                        format!(
                            "Expected a {} configuration, got {}",
                            selected.service_type(),
                            config.service_type()
                        ),
                    ));
                }
                config.validate()?;
                config
            }
            None => selected,
        };

        let record = ServiceRecord::activate(
            self.id,
            self.group_id,
            self.username.clone(),
            kind,
            config,
            provider_resource_id,
            self.estimated_cost(),
        )?;

        self.state = self.state.transition_to(SessionState::Finalized)?;
        self.updated_at = Timestamp::now();
        Ok(record)
    }

    /// Discards a denied session.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session is `Denied`
    pub fn abandon(&mut self) -> Result<(), DomainError> {
        self.state = self.state.transition_to(SessionState::Abandoned)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
