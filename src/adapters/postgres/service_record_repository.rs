//! PostgreSQL implementation of ServiceRecordRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::support::{db_error, row_to_record};
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::registry::{ServiceRecord, ServiceStatus};
use crate::ports::{ServiceFilter, ServiceRecordRepository};

const RECORD_COLUMNS: &str = "session_id, group_id, username, provider, service_type, \
     config, provider_resource_id, cost_cents, status, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of ServiceRecordRepository.
#[derive(Clone)]
pub struct PostgresServiceRecordRepository {
    pool: PgPool,
}

impl PostgresServiceRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRecordRepository for PostgresServiceRecordRepository {
    async fn find_by_session(&self, id: &SessionId) -> Result<Option<ServiceRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM service_records WHERE session_id = $1",
            RECORD_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch service record"))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<ServiceRecord>, DomainError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM service_records WHERE TRUE",
            RECORD_COLUMNS
        ));
        if let Some(group_id) = &filter.group_id {
            builder.push(" AND group_id = ").push_bind(*group_id.as_uuid());
        }
        if let Some(username) = &filter.username {
            builder
                .push(" AND username = ")
                .push_bind(username.as_str().to_string());
        }
        if !filter.statuses.is_empty() {
            let statuses: Vec<String> = filter
                .statuses
                .iter()
                .map(|s| s.as_str().to_string())
                .collect();
            builder.push(" AND status = ANY(").push_bind(statuses).push(")");
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list service records"))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn update_status(
        &self,
        record: &ServiceRecord,
        expected: ServiceStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE service_records SET
                status = $2,
                updated_at = $3,
                deleted_at = $4
            WHERE session_id = $1 AND status = $5
            "#,
        )
        .bind(record.session_id().as_uuid())
        .bind(record.status().as_str())
        .bind(record.updated_at().as_datetime())
        .bind(record.deleted_at().map(|t| *t.as_datetime()))
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("update service record"))?;

        if result.rows_affected() == 0 {
            return match self.find_by_session(record.session_id()).await? {
                Some(stored) => Err(DomainError::conflict(format!(
                    "Service {} is {}, expected {}",
                    record.session_id(),
                    stored.status(),
                    expected
                ))),
                None => Err(DomainError::not_found("Service", record.session_id())),
            };
        }
        Ok(())
    }
}
