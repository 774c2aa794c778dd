//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter for endpoint exposure; `router`
//! assembles them behind the authentication middleware.

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod groups;
pub mod middleware;
pub mod notifications;
pub mod router;
pub mod services;
pub mod sessions;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use router::{app_router, ApiContext};
