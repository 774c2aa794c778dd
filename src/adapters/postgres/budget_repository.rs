//! PostgreSQL implementation of BudgetRepository.
//!
//! Debit and revise are single conditional updates, so the
//! `0 <= used <= total` invariant holds without application-level locking.
//! The table carries the same invariant as a CHECK constraint.

use async_trait::async_trait;
use sqlx::PgPool;

use super::support::{cents, db_error, debit_in, is_foreign_key_violation, is_unique_violation, row_to_budget};
use crate::domain::budget::{Budget, BudgetUsage};
use crate::domain::foundation::{DomainError, GroupId, Money};
use crate::ports::BudgetRepository;

/// PostgreSQL implementation of BudgetRepository.
#[derive(Clone)]
pub struct PostgresBudgetRepository {
    pool: PgPool,
}

impl PostgresBudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetRepository for PostgresBudgetRepository {
    async fn allocate(&self, budget: &Budget) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO budgets (group_id, budget_total, budget_used, allocated_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(budget.group_id().as_uuid())
        .bind(cents(budget.total())?)
        .bind(cents(budget.used())?)
        .bind(budget.allocated_at().as_datetime())
        .bind(budget.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!(
                    "Group {} already has a budget",
                    budget.group_id()
                ))
            } else if is_foreign_key_violation(&e) {
                DomainError::not_found("Group", budget.group_id())
            } else {
                db_error("insert budget")(e)
            }
        })?;

        Ok(())
    }

    async fn find(&self, group_id: &GroupId) -> Result<Option<Budget>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT group_id, budget_total, budget_used, allocated_at, updated_at
            FROM budgets WHERE group_id = $1
            "#,
        )
        .bind(group_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch budget"))?;

        row.as_ref().map(row_to_budget).transpose()
    }

    async fn revise(&self, group_id: &GroupId, new_total: Money) -> Result<Budget, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE budgets SET
                budget_total = $2,
                updated_at = now()
            WHERE group_id = $1 AND budget_used <= $2
            RETURNING group_id, budget_total, budget_used, allocated_at, updated_at
            "#,
        )
        .bind(group_id.as_uuid())
        .bind(cents(new_total)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("revise budget"))?;

        if let Some(row) = row {
            return row_to_budget(&row);
        }

        // Nothing matched: let the domain explain why.
        let mut current = self
            .find(group_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Budget", group_id))?;
        current.revise(new_total)?;
        Err(DomainError::conflict(format!(
            "Budget for group {} changed concurrently",
            group_id
        )))
    }

    async fn debit(&self, group_id: &GroupId, amount: Money) -> Result<BudgetUsage, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;
        let budget = debit_in(&mut tx, group_id, amount).await?;
        tx.commit().await.map_err(db_error("commit debit"))?;
        Ok(budget.usage())
    }
}
