//! Remote pricing oracle over HTTP.
//!
//! Queries `GET {base_url}/prices/{provider}/{service_type}` and expects
//!
//! ```json
//! { "unit_price_usd": "0.0104" }
//! ```
//!
//! Prices travel as decimal strings so no precision is lost to floats.
//! A `404` means the service has no published price.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::catalog::ServiceKind;
use crate::domain::foundation::{DomainError, UnitPrice};
use crate::ports::PricingOracle;

#[derive(Debug, Deserialize)]
struct PriceResponse {
    unit_price_usd: String,
}

/// Pricing oracle that asks a remote price service.
pub struct HttpPricingOracle {
    client: Client,
    base_url: String,
}

impl HttpPricingOracle {
    /// Creates an oracle for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn price_url(&self, kind: ServiceKind) -> String {
        format!(
            "{}/prices/{}/{}",
            self.base_url,
            kind.provider(),
            kind.service_type()
        )
    }
}

#[async_trait]
impl PricingOracle for HttpPricingOracle {
    async fn unit_price(&self, kind: ServiceKind) -> Result<Option<UnitPrice>, DomainError> {
        let response = self
            .client
            .get(self.price_url(kind))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::upstream(format!("Pricing lookup for {} timed out", kind))
                } else {
                    DomainError::upstream(format!("Pricing lookup for {} failed: {}", kind, e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%kind, "No published price");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DomainError::upstream(format!(
                "Pricing service returned {} for {}",
                status, kind
            )));
        }

        let body: PriceResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("Unreadable pricing response for {}: {}", kind, e))
        })?;
        let price = UnitPrice::parse_usd(&body.unit_price_usd).map_err(|e| {
            DomainError::upstream(format!("Invalid price for {}: {}", kind, e))
        })?;
        Ok(Some(price))
    }
}
