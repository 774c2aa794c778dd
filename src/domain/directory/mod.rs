//! Directory domain module.
//!
//! Managers, the groups they own, and the login accounts of everyone
//! on the platform.
//!
//! # Membership policy
//!
//! A user belongs to at most one group at a time. The group aggregate only
//! sees its own members, so the platform-wide rule is enforced by the
//! directory store's membership index.

mod account;
mod group;
mod manager;

pub use account::Account;
pub use group::{Group, MAX_GROUP_NAME_LENGTH};
pub use manager::{Manager, MAX_GROUP_LIMIT};
