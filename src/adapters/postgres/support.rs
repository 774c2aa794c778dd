//! Row decoding and error mapping shared by the PostgreSQL adapters.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Postgres, Row, Transaction};

use crate::domain::budget::Budget;
use crate::domain::catalog::{CloudProvider, ServiceConfig, ServiceKind, ServiceType};
use crate::domain::foundation::{DomainError, GroupId, Money, SessionId, Timestamp, Username};
use crate::domain::registry::{ServiceRecord, ServiceStatus};

/// Wraps a sqlx error as a `DatabaseError` with context.
pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("Failed to {}: {}", context, e))
}

/// True if the error is a unique-key violation.
pub(super) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True if the error is a foreign-key violation.
pub(super) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

pub(super) fn get<'r, T>(row: &'r PgRow, column: &'static str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", column, e)))
}

pub(super) fn get_timestamp(row: &PgRow, column: &'static str) -> Result<Timestamp, DomainError> {
    let value: DateTime<Utc> = get(row, column)?;
    Ok(Timestamp::from_datetime(value))
}

pub(super) fn get_username(row: &PgRow, column: &'static str) -> Result<Username, DomainError> {
    let value: String = get(row, column)?;
    Username::new(value)
        .map_err(|e| DomainError::database(format!("Invalid {} in row: {}", column, e)))
}

pub(super) fn get_money(row: &PgRow, column: &'static str) -> Result<Money, DomainError> {
    let cents: i64 = get(row, column)?;
    u64::try_from(cents)
        .map(Money::from_cents)
        .map_err(|_| DomainError::database(format!("Negative amount in {}", column)))
}

/// Parses a stored enum column through its `FromStr`.
pub(super) fn get_parsed<T>(row: &PgRow, column: &'static str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value: String = get(row, column)?;
    value
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid {} in row: {}", column, e)))
}

pub(super) fn cents(amount: Money) -> Result<i64, DomainError> {
    i64::try_from(amount.cents())
        .map_err(|_| DomainError::validation("amount", format!("{} is too large", amount)))
}

pub(super) fn row_to_budget(row: &PgRow) -> Result<Budget, DomainError> {
    let group_id: uuid::Uuid = get(row, "group_id")?;
    Budget::reconstitute(
        GroupId::from_uuid(group_id),
        get_money(row, "budget_total")?,
        get_money(row, "budget_used")?,
        get_timestamp(row, "allocated_at")?,
        get_timestamp(row, "updated_at")?,
    )
}

pub(super) fn row_to_record(row: &PgRow) -> Result<ServiceRecord, DomainError> {
    let session_id: uuid::Uuid = get(row, "session_id")?;
    let group_id: uuid::Uuid = get(row, "group_id")?;
    let provider: CloudProvider = get_parsed(row, "provider")?;
    let service_type: ServiceType = get_parsed(row, "service_type")?;
    let kind = ServiceKind::new(provider, service_type)
        .map_err(|e| DomainError::database(format!("Invalid service kind in row: {}", e)))?;
    let Json(config): Json<ServiceConfig> = get(row, "config")?;
    let status: ServiceStatus = get_parsed(row, "status")?;
    let deleted_at: Option<DateTime<Utc>> = get(row, "deleted_at")?;

    Ok(ServiceRecord::reconstitute(
        SessionId::from_uuid(session_id),
        GroupId::from_uuid(group_id),
        get_username(row, "username")?,
        kind,
        config,
        get(row, "provider_resource_id")?,
        get_money(row, "cost_cents")?,
        status,
        get_timestamp(row, "created_at")?,
        get_timestamp(row, "updated_at")?,
        deleted_at.map(Timestamp::from_datetime),
    ))
}

/// Debits inside an open transaction with a single conditional update.
///
/// # Errors
///
/// - `NotFound` if the group has no budget
/// - `InsufficientBudget` if the amount does not fit, including amounts
///   too large to store
pub(super) async fn debit_in(
    tx: &mut Transaction<'_, Postgres>,
    group_id: &GroupId,
    amount: Money,
) -> Result<Budget, DomainError> {
    // An amount past BIGINT can never fit, so it skips straight to the refusal.
    let row = match i64::try_from(amount.cents()) {
        Ok(amount_cents) => sqlx::query(
            r#"
            UPDATE budgets SET
                budget_used = budget_used + $2,
                updated_at = now()
            WHERE group_id = $1 AND budget_total - budget_used >= $2
            RETURNING group_id, budget_total, budget_used, allocated_at, updated_at
            "#,
        )
        .bind(group_id.as_uuid())
        .bind(amount_cents)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_error("debit budget"))?,
        Err(_) => None,
    };

    if let Some(row) = row {
        return row_to_budget(&row);
    }

    let current = sqlx::query(
        "SELECT group_id, budget_total, budget_used, allocated_at, updated_at FROM budgets WHERE group_id = $1",
    )
    .bind(group_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_error("fetch budget"))?;

    match current {
        Some(row) => {
            let budget = row_to_budget(&row)?;
            Err(DomainError::insufficient_budget(amount, budget.remaining()))
        }
        None => Err(DomainError::not_found("Budget", group_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn cents_fit_in_bigint() {
        assert_eq!(cents(Money::from_dollars(12)).unwrap(), 1_200);
    }

    #[test]
    fn oversized_amount_is_rejected() {
        let err = cents(Money::from_cents(u64::MAX)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn db_error_keeps_context() {
        let err = db_error("fetch budget")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to fetch budget"));
    }

    #[test]
    fn non_database_errors_are_not_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolTimedOut));
    }
}
