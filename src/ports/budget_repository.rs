//! Budget repository port.
//!
//! Owns the only piece of shared mutable state in the workflow: a group's
//! used budget.
//!
//! # Atomicity
//!
//! `debit` MUST be a single conditional update against the store
//! (check-and-increment of `used`), never a read followed by a write.
//! Two finalizing sessions may both have been authorized against the same
//! stale remaining amount; only the store can decide which one fits.

use crate::domain::budget::{Budget, BudgetUsage};
use crate::domain::foundation::{DomainError, GroupId, Money};
use async_trait::async_trait;

/// Repository port for group budgets.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Store a first allocation.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the group doesn't exist
    /// - `Conflict` if the group already has a budget
    async fn allocate(&self, budget: &Budget) -> Result<(), DomainError>;

    /// Find a group's budget.
    async fn find(&self, group_id: &GroupId) -> Result<Option<Budget>, DomainError>;

    /// Replace the total, refusing to go below what is used.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no budget was allocated
    /// - `ValidationFailed` if `new_total` is below the used amount
    async fn revise(&self, group_id: &GroupId, new_total: Money) -> Result<Budget, DomainError>;

    /// Atomically consume `amount` if it fits in the remaining budget.
    ///
    /// Returns the usage after the debit.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no budget was allocated
    /// - `InsufficientBudget` if `amount` exceeds the remaining budget
    async fn debit(&self, group_id: &GroupId, amount: Money) -> Result<BudgetUsage, DomainError>;
}
