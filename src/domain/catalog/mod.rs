//! Catalog domain module.
//!
//! Providers, service types, the typed configuration payload for each
//! service, and the registry that holds per-service pricing and
//! identification rules.

mod registry;
mod service_config;
mod service_kind;

pub use registry::{
    PricingModel, ServiceCatalog, ServiceDescriptor, DEFAULT_STORAGE_GB, HOURS_PER_QUARTER,
    MONTHS_PER_QUARTER,
};
pub use service_config::ServiceConfig;
pub use service_kind::{CloudProvider, ServiceKind, ServiceType};
