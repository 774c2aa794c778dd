//! PostgreSQL implementation of SessionRepository.
//!
//! Config and estimate are stored as JSONB using their serde forms.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::PgPool;

use super::support::{db_error, get, get_parsed, get_timestamp, get_username};
use crate::domain::catalog::{CloudProvider, ServiceConfig};
use crate::domain::foundation::{DomainError, GroupId, SessionId};
use crate::domain::provisioning::{CostEstimate, ProvisioningSession, SessionState};
use crate::ports::SessionRepository;

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explains why a conditional statement matched no row.
    async fn mismatch(&self, id: &SessionId, expected: SessionState) -> DomainError {
        let stored: Result<Option<(String,)>, _> =
            sqlx::query_as("SELECT state FROM sessions WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await;
        match stored {
            Ok(Some((state,))) => DomainError::conflict(format!(
                "Session {} is {}, expected {}",
                id, state, expected
            )),
            Ok(None) => DomainError::not_found("Session", id),
            Err(e) => db_error("fetch session state")(e),
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &ProvisioningSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, username, group_id, provider, config, state, estimate, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.username().as_str())
        .bind(session.group_id().as_uuid())
        .bind(session.provider().as_str())
        .bind(session.config().map(Json))
        .bind(session.state().as_str())
        .bind(session.estimate().map(Json))
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert session"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<ProvisioningSession>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, group_id, provider, config, state, estimate, created_at, updated_at
            FROM sessions WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch session"))?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn update(
        &self,
        session: &ProvisioningSession,
        expected: SessionState,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                config = $2,
                state = $3,
                estimate = $4,
                updated_at = $5
            WHERE id = $1 AND state = $6
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.config().map(Json))
        .bind(session.state().as_str())
        .bind(session.estimate().map(Json))
        .bind(session.updated_at().as_datetime())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("update session"))?;

        if result.rows_affected() == 0 {
            return Err(self.mismatch(session.id(), expected).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &SessionId, expected: SessionState) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND state = $2")
            .bind(id.as_uuid())
            .bind(expected.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete session"))?;

        if result.rows_affected() == 0 {
            return Err(self.mismatch(id, expected).await);
        }
        Ok(())
    }
}

fn row_to_session(row: &PgRow) -> Result<ProvisioningSession, DomainError> {
    let id: uuid::Uuid = get(row, "id")?;
    let group_id: uuid::Uuid = get(row, "group_id")?;
    let provider: CloudProvider = get_parsed(row, "provider")?;
    let state: SessionState = get_parsed(row, "state")?;
    let config: Option<Json<ServiceConfig>> = get(row, "config")?;
    let estimate: Option<Json<CostEstimate>> = get(row, "estimate")?;

    Ok(ProvisioningSession::reconstitute(
        SessionId::from_uuid(id),
        get_username(row, "username")?,
        GroupId::from_uuid(group_id),
        provider,
        config.map(|Json(c)| c),
        state,
        estimate.map(|Json(e)| e),
        get_timestamp(row, "created_at")?,
        get_timestamp(row, "updated_at")?,
    ))
}
