//! HTTP routes for provisioned services.

use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers::{delete_service, list_services, usage_report, ServiceHandlers};

/// Creates the service router, mounted under `/api`.
pub fn service_routes(handlers: ServiceHandlers) -> Router {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/report", get(usage_report))
        .route("/services/:session_id", delete(delete_service))
        .with_state(handlers)
}
