//! GET /api/catalog/:provider - What a provider offers and at what price.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::adapters::http::error::{parse_path_id, ApiResult};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::catalog::{CatalogEntry, ListCatalogHandler};
use crate::domain::catalog::{CloudProvider, PricingModel, ServiceType};
use crate::domain::foundation::Role;

#[derive(Clone)]
pub struct CatalogHandlers {
    pub list_catalog: Arc<ListCatalogHandler>,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntryResponse {
    pub provider: CloudProvider,
    pub service_type: ServiceType,
    pub display_name: String,
    pub pricing: Option<PricingModel>,
    pub identifier_field: String,
    pub composite: bool,
    /// Current unit price, e.g. `"$0.010400"`; absent when unknown.
    pub unit_price_usd: Option<String>,
}

impl From<CatalogEntry> for CatalogEntryResponse {
    fn from(entry: CatalogEntry) -> Self {
        let descriptor = entry.descriptor;
        Self {
            provider: descriptor.kind.provider(),
            service_type: descriptor.kind.service_type(),
            display_name: descriptor.display_name.to_string(),
            pricing: descriptor.pricing,
            identifier_field: descriptor.identifier_field.to_string(),
            composite: descriptor.composite,
            unit_price_usd: entry.unit_price.map(|p| p.to_string()),
        }
    }
}

pub async fn list_catalog(
    State(handlers): State<CatalogHandlers>,
    auth: RequireAuth,
    Path(provider): Path<String>,
) -> ApiResult<Json<Vec<CatalogEntryResponse>>> {
    auth.require(&[Role::Admin, Role::Manager, Role::User])?;
    let provider: CloudProvider = parse_path_id(&provider, "provider")?;
    let entries = handlers.list_catalog.handle(provider).await?;
    Ok(Json(entries.into_iter().map(CatalogEntryResponse::from).collect()))
}

/// Creates the catalog router, mounted under `/api`.
pub fn catalog_routes(handlers: CatalogHandlers) -> Router {
    Router::new()
        .route("/catalog/:provider", get(list_catalog))
        .with_state(handlers)
}
