//! Pricing source configuration
//!
//! Prices come from one of three places, in order of precedence:
//!
//! 1. a remote oracle at `oracle_url`
//! 2. an explicit `price_table` such as `aws/ec2=0.0104,gcp/cloud_sql=0.015`
//! 3. the built-in list prices

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::ValidationError;

/// Pricing configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingConfig {
    /// Base URL of a remote price service
    pub oracle_url: Option<String>,

    /// Per-request timeout for the remote price service
    #[serde(default = "default_oracle_timeout")]
    pub oracle_timeout_secs: u64,

    /// Comma-separated `provider/service=usd` entries
    pub price_table: Option<String>,
}

/// Where unit prices are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingSource {
    Oracle { url: String, timeout: Duration },
    /// Entries keyed by `provider/service`, values in USD.
    Table(HashMap<String, String>),
    ListPrices,
}

impl PricingConfig {
    /// Resolves the configured source.
    ///
    /// # Errors
    ///
    /// - `InvalidPriceEntry` if a table entry is not `kind=price`
    pub fn source(&self) -> Result<PricingSource, ValidationError> {
        if let Some(url) = &self.oracle_url {
            return Ok(PricingSource::Oracle {
                url: url.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(self.oracle_timeout_secs),
            });
        }
        match &self.price_table {
            Some(table) => parse_table(table).map(PricingSource::Table),
            None => Ok(PricingSource::ListPrices),
        }
    }

    /// Validate pricing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.oracle_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidOracleUrl(url.clone()));
            }
            if self.oracle_timeout_secs == 0 {
                return Err(ValidationError::InvalidTimeout);
            }
        }
        self.source().map(|_| ())
    }
}

fn parse_table(table: &str) -> Result<HashMap<String, String>, ValidationError> {
    table
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (kind, price) = entry
                .split_once('=')
                .ok_or_else(|| ValidationError::InvalidPriceEntry(entry.to_string()))?;
            let (kind, price) = (kind.trim(), price.trim());
            if kind.is_empty() || price.is_empty() {
                return Err(ValidationError::InvalidPriceEntry(entry.to_string()));
            }
            Ok((kind.to_lowercase(), price.to_string()))
        })
        .collect()
}

fn default_oracle_timeout() -> u64 {
    5
}
