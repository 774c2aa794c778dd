//! Budget ledger handlers.

mod allocate_budget;
mod get_budget;
mod revise_budget;

pub use allocate_budget::{AllocateBudgetCommand, AllocateBudgetHandler};
pub use get_budget::GetBudgetHandler;
pub use revise_budget::{ReviseBudgetCommand, ReviseBudgetHandler};
