//! HTTP middleware for axum.
//!
//! - `auth` - bearer token middleware, the `RequireAuth` extractor and role gates

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
