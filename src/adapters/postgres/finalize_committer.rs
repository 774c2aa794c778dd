//! PostgreSQL implementation of FinalizeCommitter.
//!
//! Runs the whole finalize in one transaction. Any early return drops the
//! transaction, which rolls it back.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::support::{cents, db_error, debit_in, is_unique_violation};
use crate::domain::budget::BudgetUsage;
use crate::domain::foundation::DomainError;
use crate::domain::provisioning::SessionState;
use crate::ports::{FinalizeCommit, FinalizeCommitter};

/// PostgreSQL implementation of FinalizeCommitter.
#[derive(Clone)]
pub struct PostgresFinalizeCommitter {
    pool: PgPool,
}

impl PostgresFinalizeCommitter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FinalizeCommitter for PostgresFinalizeCommitter {
    async fn commit(&self, commit: &FinalizeCommit) -> Result<BudgetUsage, DomainError> {
        let session_id = commit.session.id();
        let record = &commit.record;
        let already_finalized =
            || DomainError::conflict(format!("Session {} has already been finalized", session_id));

        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        // Lock first: a concurrent finalize of the same session queues here
        // and sees the winner's record once the lock is released.
        let state: Option<(String,)> =
            sqlx::query_as("SELECT state FROM sessions WHERE id = $1 FOR UPDATE")
                .bind(session_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("lock session"))?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM service_records WHERE session_id = $1")
                .bind(session_id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("check service record"))?;
        if existing > 0 {
            return Err(already_finalized());
        }

        match state {
            None => return Err(DomainError::not_found("Session", session_id)),
            Some((state,)) if state != SessionState::Authorized.as_str() => {
                return Err(DomainError::conflict(format!(
                    "Session {} is {}, expected {}",
                    session_id,
                    state,
                    SessionState::Authorized
                )));
            }
            Some(_) => {}
        }

        let budget = debit_in(&mut tx, commit.session.group_id(), commit.amount).await?;

        sqlx::query(
            r#"
            INSERT INTO service_records (
                session_id, group_id, username, provider, service_type, config,
                provider_resource_id, cost_cents, status, created_at, updated_at, deleted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NULL)
            "#,
        )
        .bind(record.session_id().as_uuid())
        .bind(record.group_id().as_uuid())
        .bind(record.username().as_str())
        .bind(record.kind().provider().as_str())
        .bind(record.kind().service_type().as_str())
        .bind(Json(record.config()))
        .bind(record.provider_resource_id())
        .bind(cents(record.cost())?)
        .bind(record.status().as_str())
        .bind(record.created_at().as_datetime())
        .bind(record.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                already_finalized()
            } else {
                db_error("insert service record")(e)
            }
        })?;

        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete session"))?;

        tx.commit().await.map_err(db_error("commit finalize"))?;
        Ok(budget.usage())
    }
}
