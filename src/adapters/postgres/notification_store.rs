//! PostgreSQL notification sink and reader.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::support::{db_error, get, get_parsed, get_timestamp, get_username};
use crate::domain::foundation::{DomainError, Username};
use crate::domain::notification::{Notification, NotificationCategory};
use crate::ports::{NotificationReader, NotificationSink};

/// Appends notifications to the `notifications` table.
#[derive(Clone)]
pub struct PostgresNotificationStore {
    pool: PgPool,
}

impl PostgresNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PostgresNotificationStore {
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, manager, category, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.id)
        .bind(notification.manager.as_str())
        .bind(notification.category.as_str())
        .bind(&notification.message)
        .bind(notification.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert notification"))?;

        Ok(())
    }
}

#[async_trait]
impl NotificationReader for PostgresNotificationStore {
    async fn list_for_manager(
        &self,
        manager: &Username,
        limit: usize,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, manager, category, message, created_at
            FROM notifications
            WHERE manager = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(manager.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list notifications"))?;

        rows.iter().map(row_to_notification).collect()
    }
}

fn row_to_notification(row: &PgRow) -> Result<Notification, DomainError> {
    let category: NotificationCategory = get_parsed(row, "category")?;
    Ok(Notification {
        id: get(row, "id")?,
        manager: get_username(row, "manager")?,
        category,
        message: get(row, "message")?,
        created_at: get_timestamp(row, "created_at")?,
    })
}
