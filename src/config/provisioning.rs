//! Provisioning workflow configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::budget::DEFAULT_ALERT_THRESHOLD_PERCENT;

const MAX_DISPATCH_TIMEOUT_SECS: u64 = 600;

/// Provisioning configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningConfig {
    /// Upper bound on a single provisioner call, in seconds
    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_secs: u64,

    /// Budget usage percentage that triggers a manager alert
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold_percent: u8,
}

impl ProvisioningConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }

    /// Validate provisioning configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dispatch_timeout_secs == 0 || self.dispatch_timeout_secs > MAX_DISPATCH_TIMEOUT_SECS {
            return Err(ValidationError::InvalidDispatchTimeout);
        }
        if self.alert_threshold_percent == 0 || self.alert_threshold_percent > 100 {
            return Err(ValidationError::InvalidAlertThreshold);
        }
        Ok(())
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_secs: default_dispatch_timeout(),
            alert_threshold_percent: default_alert_threshold(),
        }
    }
}

fn default_dispatch_timeout() -> u64 {
    30
}

fn default_alert_threshold() -> u8 {
    DEFAULT_ALERT_THRESHOLD_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_defaults() {
        let config = ProvisioningConfig::default();
        assert_eq!(config.dispatch_timeout(), Duration::from_secs(30));
        assert_eq!(config.alert_threshold_percent, 75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dispatch_timeout_bounds() {
        for secs in [0, 601] {
            let config = ProvisioningConfig {
                dispatch_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidDispatchTimeout));
        }
    }

    #[test]
    fn test_alert_threshold_bounds() {
        for percent in [0, 101] {
            let config = ProvisioningConfig {
                alert_threshold_percent: percent,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidAlertThreshold));
        }
    }
}
