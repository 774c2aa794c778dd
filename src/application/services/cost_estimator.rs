//! CostEstimator - prices a requested service over the billing horizon.
//!
//! Pure over its inputs: the catalog decides the pricing model, the
//! oracle supplies the unit price, and nothing is persisted.

use std::sync::Arc;

use crate::domain::catalog::{CloudProvider, ServiceCatalog, ServiceConfig, ServiceKind};
use crate::domain::foundation::DomainError;
use crate::domain::provisioning::CostEstimate;
use crate::ports::PricingOracle;

/// Turns a provider and service config into a [`CostEstimate`].
pub struct CostEstimator {
    catalog: Arc<ServiceCatalog>,
    oracle: Arc<dyn PricingOracle>,
}

impl CostEstimator {
    pub fn new(catalog: Arc<ServiceCatalog>, oracle: Arc<dyn PricingOracle>) -> Self {
        Self { catalog, oracle }
    }

    /// Estimates the cost of `config` on `provider`.
    ///
    /// Services without a pricing model, and services the oracle has no
    /// price for, are unestimable rather than an error.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the provider does not offer the service
    /// - `UpstreamFailure` if the oracle cannot be reached
    pub async fn estimate(
        &self,
        provider: CloudProvider,
        config: &ServiceConfig,
    ) -> Result<CostEstimate, DomainError> {
        let kind = ServiceKind::new(provider, config.service_type())?;

        let Some(model) = self.catalog.descriptor(&kind).and_then(|d| d.pricing) else {
            tracing::debug!(%kind, "No pricing model, estimate is unestimable");
            return Ok(CostEstimate::Unestimable);
        };

        let Some(unit_price) = self.oracle.unit_price(kind).await? else {
            tracing::info!(%kind, "No unit price published, estimate is unestimable");
            return Ok(CostEstimate::Unestimable);
        };

        Ok(CostEstimate::priced(unit_price, model.billable_units(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pricing::StaticPriceTable;
    use crate::domain::catalog::ServiceType;
    use crate::domain::foundation::{ErrorCode, Money, UnitPrice};
    use async_trait::async_trait;

    struct UnreachableOracle;

    #[async_trait]
    impl PricingOracle for UnreachableOracle {
        async fn unit_price(
            &self,
            _kind: ServiceKind,
        ) -> Result<Option<crate::domain::foundation::UnitPrice>, DomainError> {
            Err(DomainError::upstream("connection refused"))
        }
    }

    fn estimator(oracle: impl PricingOracle + 'static) -> CostEstimator {
        CostEstimator::new(Arc::new(ServiceCatalog::standard()), Arc::new(oracle))
    }

    fn ec2() -> ServiceConfig {
        ServiceConfig::Ec2 {
            instance_name: "web".to_string(),
            instance_type: "t3.micro".to_string(),
            ami_id: "ami-0abc".to_string(),
            key_name: None,
            subnet_id: None,
            security_group_id: None,
        }
    }

    fn s3(size_gb: Option<u64>) -> ServiceConfig {
        ServiceConfig::S3 {
            bucket_name: "assets".to_string(),
            region: "us-east-1".to_string(),
            versioning: false,
            size_gb,
        }
    }

    #[tokio::test]
    async fn hourly_service_is_priced_for_a_quarter() {
        let table = StaticPriceTable::empty()
            .with_price(ServiceKind::of(ServiceType::Ec2), UnitPrice::from_micros(100_000));

        let estimate = estimator(table).estimate(CloudProvider::Aws, &ec2()).await.unwrap();

        // $0.10 * 24 * 90
        assert_eq!(estimate.amount(), Money::from_dollars(216));
    }

    #[tokio::test]
    async fn storage_defaults_to_one_terabyte() {
        let table = StaticPriceTable::empty()
            .with_price(ServiceKind::of(ServiceType::S3), UnitPrice::from_micros(23_000));
        let estimator = estimator(table);

        let default_size = estimator.estimate(CloudProvider::Aws, &s3(None)).await.unwrap();
        let small = estimator.estimate(CloudProvider::Aws, &s3(Some(10))).await.unwrap();

        // $0.023 * 1024 GB * 3 months = $70.656 -> $70.66
        assert_eq!(default_size.amount(), Money::from_cents(7_066));
        // $0.023 * 10 GB * 3 months = $0.69
        assert_eq!(small.amount(), Money::from_cents(69));
    }

    #[tokio::test]
    async fn service_without_pricing_model_is_unestimable() {
        let lambda = ServiceConfig::Lambda {
            function_name: "resize".to_string(),
            runtime: "python3.12".to_string(),
            handler: "main.handler".to_string(),
            region: "us-east-1".to_string(),
            memory_mb: 128,
        };

        let estimate = estimator(UnreachableOracle)
            .estimate(CloudProvider::Aws, &lambda)
            .await
            .unwrap();

        assert!(estimate.is_unestimable());
        assert_eq!(estimate.amount(), Money::ZERO);
    }

    #[tokio::test]
    async fn missing_price_is_unestimable() {
        let estimate = estimator(StaticPriceTable::empty())
            .estimate(CloudProvider::Aws, &ec2())
            .await
            .unwrap();
        assert!(estimate.is_unestimable());
    }

    #[tokio::test]
    async fn oracle_failure_is_upstream_failure() {
        let err = estimator(UnreachableOracle)
            .estimate(CloudProvider::Aws, &ec2())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamFailure);
    }

    #[tokio::test]
    async fn cross_provider_config_is_rejected() {
        let err = estimator(StaticPriceTable::list_prices())
            .estimate(CloudProvider::Gcp, &ec2())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
