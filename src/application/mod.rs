//! Application layer - handlers and the services they share.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Write handlers take a command plus `CommandMetadata`; read handlers take
//! the caller's metadata to scope what they return.

pub mod handlers;
pub mod services;

pub use services::{CostEstimator, Notifier, ProvisioningDispatcher};
