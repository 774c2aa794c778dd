//! Cloud Steward - Budget-gated cloud provisioning for managed groups
//!
//! Managers own groups of users and allocate each group a budget. Users
//! walk a provisioning session through service selection and a cost gate;
//! an authorized session is created with the cloud provider and its cost is
//! debited from the group budget in the same commit that records the service.
//!
//! # Layout
//!
//! - `domain` - Entities, value objects and state machines
//! - `ports` - Traits the application depends on
//! - `application` - Command handlers and orchestration services
//! - `adapters` - PostgreSQL, in-memory, HTTP, pricing and provisioner implementations
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
