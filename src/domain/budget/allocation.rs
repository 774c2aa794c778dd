//! Group budget value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, GroupId, Money, Timestamp};

/// A group's allocated and consumed budget.
///
/// # Invariants
///
/// - `used <= total` at all times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    group_id: GroupId,
    total: Money,
    used: Money,
    allocated_at: Timestamp,
    updated_at: Timestamp,
}

impl Budget {
    /// Creates a fresh allocation with nothing used.
    pub fn allocate(group_id: GroupId, total: Money) -> Self {
        let now = Timestamp::now();
        Self {
            group_id,
            total,
            used: Money::ZERO,
            allocated_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a budget from persistence.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the stored row violates `used <= total`
    pub fn reconstitute(
        group_id: GroupId,
        total: Money,
        used: Money,
        allocated_at: Timestamp,
        updated_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if used > total {
            return Err(DomainError::database(format!(
                "Budget for group {} has used {} above total {}",
                group_id, used, total
            )));
        }
        Ok(Self {
            group_id,
            total,
            used,
            allocated_at,
            updated_at,
        })
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn used(&self) -> Money {
        self.used
    }

    pub fn remaining(&self) -> Money {
        self.total.saturating_sub(self.used)
    }

    pub fn allocated_at(&self) -> &Timestamp {
        &self.allocated_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Changes the total.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `new_total` is below what is already used
    pub fn revise(&mut self, new_total: Money) -> Result<(), DomainError> {
        if new_total < self.used {
            return Err(DomainError::validation(
                "total",
                format!(
                    "New total {} is below the {} already used",
                    new_total, self.used
                ),
            )
            .with_detail("used_cents", self.used.cents().to_string()));
        }
        self.total = new_total;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Consumes `amount` if it fits in what remains.
    ///
    /// This is the in-process check-and-update; callers must hold whatever
    /// lock makes it atomic with respect to other debits.
    ///
    /// # Errors
    ///
    /// - `InsufficientBudget` if `amount` exceeds the remaining budget
    pub fn debit(&mut self, amount: Money) -> Result<(), DomainError> {
        let remaining = self.remaining();
        if amount > remaining {
            return Err(DomainError::insufficient_budget(amount, remaining));
        }
        self.used = self
            .used
            .checked_add(amount)
            .ok_or_else(|| DomainError::insufficient_budget(amount, remaining))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Snapshot for read models.
    pub fn usage(&self) -> BudgetUsage {
        BudgetUsage {
            group_id: self.group_id,
            total: self.total,
            used: self.used,
            remaining: self.remaining(),
        }
    }
}

/// Read model of a group's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetUsage {
    pub group_id: GroupId,
    pub total: Money,
    pub used: Money,
    pub remaining: Money,
}
