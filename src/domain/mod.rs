//! Domain layer - pure business logic with no infrastructure dependencies.

pub mod budget;
pub mod catalog;
pub mod directory;
pub mod foundation;
pub mod notification;
pub mod provisioning;
pub mod registry;
