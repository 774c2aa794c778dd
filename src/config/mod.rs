//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLOUD_STEWARD` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cloud_steward::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server binds {:?}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod pricing;
mod provisioning;
mod server;

pub use auth::{AuthConfig, BootstrapAdmin};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use pricing::{PricingConfig, PricingSource};
pub use provisioning::ProvisioningConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection. Absent means the in-memory store.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Token signing and bootstrap administrator
    pub auth: AuthConfig,

    /// Price source for cost estimates
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Dispatch timeout and budget alerting
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLOUD_STEWARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLOUD_STEWARD__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLOUD_STEWARD__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLOUD_STEWARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, section by section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.pricing.validate()?;
        self.provisioning.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global, so these tests take turns.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "CLOUD_STEWARD__AUTH__JWT_SECRET",
        "CLOUD_STEWARD__DATABASE__URL",
        "CLOUD_STEWARD__SERVER__PORT",
        "CLOUD_STEWARD__SERVER__ENVIRONMENT",
        "CLOUD_STEWARD__PRICING__PRICE_TABLE",
        "CLOUD_STEWARD__PROVISIONING__DISPATCH_TIMEOUT_SECS",
        "CLOUD_STEWARD__AUTH__BOOTSTRAP_ADMIN_USERNAME",
    ];

    fn set_minimal_env() {
        env::set_var("CLOUD_STEWARD__AUTH__JWT_SECRET", "0123456789abcdef0123456789abcdef");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.auth.issuer, "cloud-steward");
        assert_eq!(
            config.auth.jwt_secret.expose_secret(),
            "0123456789abcdef0123456789abcdef"
        );
        assert_eq!(config.pricing.source().unwrap(), PricingSource::ListPrices);
        assert_eq!(config.provisioning.dispatch_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("CLOUD_STEWARD__SERVER__PORT", "3000"),
            ("CLOUD_STEWARD__DATABASE__URL", "postgresql://steward@localhost/steward"),
            ("CLOUD_STEWARD__PROVISIONING__DISPATCH_TIMEOUT_SECS", "5"),
            ("CLOUD_STEWARD__PRICING__PRICE_TABLE", "aws/ec2=0.10"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert!(config.database.is_some());
        assert_eq!(config.provisioning.dispatch_timeout_secs, 5);
        assert!(matches!(config.pricing.source().unwrap(), PricingSource::Table(_)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("CLOUD_STEWARD__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_missing_jwt_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::remove_var("CLOUD_STEWARD__AUTH__JWT_SECRET");
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_half_configured_bootstrap_admin_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config =
            load_with(&[("CLOUD_STEWARD__AUTH__BOOTSTRAP_ADMIN_USERNAME", "root")]).unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::IncompleteBootstrapAdmin)
        );
    }
}
