//! Catalog query: what a provider offers and at what unit price.

use std::sync::Arc;

use crate::domain::catalog::{CloudProvider, ServiceCatalog, ServiceDescriptor};
use crate::domain::foundation::{DomainError, UnitPrice};
use crate::ports::PricingOracle;

/// A catalog entry with its current unit price, when one is known.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub descriptor: ServiceDescriptor,
    pub unit_price: Option<UnitPrice>,
}

pub struct ListCatalogHandler {
    catalog: Arc<ServiceCatalog>,
    oracle: Arc<dyn PricingOracle>,
}

impl ListCatalogHandler {
    pub fn new(catalog: Arc<ServiceCatalog>, oracle: Arc<dyn PricingOracle>) -> Self {
        Self { catalog, oracle }
    }

    /// Lists the provider's services. An unreachable oracle only hides
    /// prices; the listing itself still succeeds.
    pub async fn handle(&self, provider: CloudProvider) -> Result<Vec<CatalogEntry>, DomainError> {
        let mut entries = Vec::new();
        for descriptor in self.catalog.services_for(provider) {
            let unit_price = if descriptor.pricing.is_some() {
                match self.oracle.unit_price(descriptor.kind).await {
                    Ok(price) => price,
                    Err(e) => {
                        tracing::warn!(kind = %descriptor.kind, error = %e, "Price lookup failed");
                        None
                    }
                }
            } else {
                None
            };
            entries.push(CatalogEntry {
                descriptor: descriptor.clone(),
                unit_price,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pricing::StaticPriceTable;
    use crate::domain::catalog::ServiceType;

    #[tokio::test]
    async fn lists_provider_services_with_prices() {
        let handler = ListCatalogHandler::new(
            Arc::new(ServiceCatalog::standard()),
            Arc::new(StaticPriceTable::list_prices()),
        );

        let gcp = handler.handle(CloudProvider::Gcp).await.unwrap();

        assert_eq!(gcp.len(), 6);
        let engine = gcp
            .iter()
            .find(|e| e.descriptor.kind.service_type() == ServiceType::ComputeEngine)
            .unwrap();
        assert!(engine.unit_price.is_some());
        let gke = gcp
            .iter()
            .find(|e| e.descriptor.kind.service_type() == ServiceType::Gke)
            .unwrap();
        assert!(gke.unit_price.is_none());
    }

    #[tokio::test]
    async fn aws_offers_seven_services() {
        let handler = ListCatalogHandler::new(
            Arc::new(ServiceCatalog::standard()),
            Arc::new(StaticPriceTable::empty()),
        );
        assert_eq!(handler.handle(CloudProvider::Aws).await.unwrap().len(), 7);
    }
}
