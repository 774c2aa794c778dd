//! HTTP adapter for provisioned services and usage reports.

mod dto;
mod handlers;
mod routes;

pub use dto::{ListServicesParams, ServiceResponse, UsageReportParams, UsageReportResponse};
pub use handlers::ServiceHandlers;
pub use routes::service_routes;
