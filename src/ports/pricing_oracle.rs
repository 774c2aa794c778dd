//! Pricing oracle port.
//!
//! Returns the current unit price for a service. The unit is defined by
//! the service's pricing model in the catalog (per hour, or per GB-month).

use crate::domain::catalog::ServiceKind;
use crate::domain::foundation::{DomainError, UnitPrice};
use async_trait::async_trait;

/// Port for unit price lookups.
#[async_trait]
pub trait PricingOracle: Send + Sync {
    /// Look up the unit price for a service.
    ///
    /// `Ok(None)` means no price is published for this service, which is a
    /// normal outcome and makes the estimate unestimable.
    ///
    /// # Errors
    ///
    /// - `UpstreamFailure` if the price source cannot be reached or answers garbage
    async fn unit_price(&self, kind: ServiceKind) -> Result<Option<UnitPrice>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_oracle_is_object_safe() {
        fn _accepts_dyn(_o: &dyn PricingOracle) {}
    }
}
