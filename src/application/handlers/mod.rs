//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over the
//! injected ports. Each handler takes the caller as [`CommandMetadata`]
//! and enforces ownership; role tiers are enforced at the HTTP boundary.
//!
//! [`CommandMetadata`]: crate::domain::foundation::CommandMetadata

pub mod accounts;
pub mod budget;
pub mod catalog;
pub mod directory;
pub mod notifications;
pub mod provisioning;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
