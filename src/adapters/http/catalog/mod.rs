//! HTTP adapter for the service catalog.

mod handlers;

pub use handlers::{catalog_routes, CatalogEntryResponse, CatalogHandlers};
