//! Price table oracle.
//!
//! Serves unit prices from a fixed table, loaded from configuration or
//! built from the list prices below. Kinds missing from the table are
//! unestimable.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::catalog::{ServiceKind, ServiceType};
use crate::domain::foundation::{DomainError, UnitPrice};
use crate::ports::PricingOracle;

/// On-demand list prices in micro-dollars per billing unit.
const LIST_PRICES: [(ServiceType, u64); 6] = [
    // t3.micro, per hour
    (ServiceType::Ec2, 10_400),
    // S3 standard, per GB-month
    (ServiceType::S3, 23_000),
    // db.t3.micro, per hour
    (ServiceType::Rds, 17_000),
    // e2-micro, per hour
    (ServiceType::ComputeEngine, 8_400),
    // standard storage, per GB-month
    (ServiceType::CloudStorage, 20_000),
    // db-f1-micro, per hour
    (ServiceType::CloudSql, 15_000),
];

/// Pricing oracle backed by an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceTable {
    prices: HashMap<ServiceKind, UnitPrice>,
}

impl StaticPriceTable {
    /// An empty table: every service is unestimable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in list prices.
    pub fn list_prices() -> Self {
        let prices = LIST_PRICES
            .iter()
            .map(|(service_type, micros)| {
                (ServiceKind::of(*service_type), UnitPrice::from_micros(*micros))
            })
            .collect();
        Self { prices }
    }

    /// Builds a table from `provider/service_type -> "0.0104"` entries.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for an unknown kind or a malformed price
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, DomainError> {
        let mut prices = HashMap::new();
        for (kind, price) in entries {
            let kind: ServiceKind = kind.parse()?;
            prices.insert(kind, UnitPrice::parse_usd(price)?);
        }
        Ok(Self { prices })
    }

    /// Sets one price, replacing any earlier one.
    pub fn with_price(mut self, kind: ServiceKind, price: UnitPrice) -> Self {
        self.prices.insert(kind, price);
        self
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[async_trait]
impl PricingOracle for StaticPriceTable {
    async fn unit_price(&self, kind: ServiceKind) -> Result<Option<UnitPrice>, DomainError> {
        Ok(self.prices.get(&kind).copied())
    }
}
