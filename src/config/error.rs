//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("JWT secret must be at least {0} bytes")]
    JwtSecretTooShort(usize),

    #[error("Token TTL must be between 60 seconds and 7 days")]
    InvalidTokenTtl,

    #[error("Bootstrap admin needs both a username and a password")]
    IncompleteBootstrapAdmin,

    #[error("Invalid pricing oracle URL: {0}")]
    InvalidOracleUrl(String),

    #[error("Invalid price table entry: {0}")]
    InvalidPriceEntry(String),

    #[error("Dispatch timeout must be between 1 and 600 seconds")]
    InvalidDispatchTimeout,

    #[error("Alert threshold must be between 1 and 100 percent")]
    InvalidAlertThreshold,
}
