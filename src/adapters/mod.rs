//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT tokens and Argon2 password hashing
//! - `http` - REST API (axum)
//! - `memory` - In-process store for development and tests
//! - `postgres` - PostgreSQL repositories (sqlx)
//! - `pricing` - Static price tables and the remote price oracle
//! - `provisioner` - Cloud provisioner implementations

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod pricing;
pub mod provisioner;

pub use auth::{Argon2PasswordHasher, JwtAuthenticator};
pub use memory::InMemoryStore;
pub use pricing::{HttpPricingOracle, StaticPriceTable};
pub use provisioner::SimulatedProvisioner;
