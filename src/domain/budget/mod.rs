//! Budget domain module.
//!
//! Each group has at most one budget: allocated once, revised afterwards,
//! and consumed only by atomic debits when a provisioning session is
//! finalized.

mod alert;
mod allocation;

pub use alert::{BudgetAlertPolicy, DEFAULT_ALERT_THRESHOLD_PERCENT};
pub use allocation::{Budget, BudgetUsage};
