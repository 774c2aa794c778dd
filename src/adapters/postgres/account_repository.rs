//! PostgreSQL implementation of AccountRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::support::{db_error, get, get_parsed, get_timestamp, get_username, is_unique_violation};
use crate::domain::directory::{Account, Manager};
use crate::domain::foundation::{DomainError, Role, Username};
use crate::ports::AccountRepository;

/// PostgreSQL implementation of AccountRepository.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn username_taken(username: &Username) -> DomainError {
    DomainError::conflict(format!("Username '{}' is already taken", username))
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn save_account(&self, account: &Account) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (username, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.username().as_str())
        .bind(account.password_hash())
        .bind(account.role().as_str())
        .bind(account.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                username_taken(account.username())
            } else {
                db_error("insert account")(e)
            }
        })?;

        Ok(())
    }

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            "SELECT username, password_hash, role, created_at FROM accounts WHERE username = $1",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch account"))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn delete_account(&self, username: &Username) -> Result<(), DomainError> {
        // group_members rows cascade with the account.
        let result = sqlx::query("DELETE FROM accounts WHERE username = $1")
            .bind(username.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete account"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Account", username));
        }
        Ok(())
    }

    async fn save_manager(&self, manager: &Manager, account: &Account) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (username, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.username().as_str())
        .bind(account.password_hash())
        .bind(account.role().as_str())
        .bind(account.created_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                username_taken(account.username())
            } else {
                db_error("insert account")(e)
            }
        })?;

        sqlx::query(
            "INSERT INTO managers (username, group_limit, created_at) VALUES ($1, $2, $3)",
        )
        .bind(manager.username().as_str())
        .bind(manager.group_limit() as i32)
        .bind(manager.created_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert manager"))?;

        tx.commit().await.map_err(db_error("commit manager"))?;
        Ok(())
    }

    async fn find_manager(&self, username: &Username) -> Result<Option<Manager>, DomainError> {
        let row = sqlx::query(
            "SELECT username, group_limit, created_at FROM managers WHERE username = $1",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch manager"))?;

        row.as_ref().map(row_to_manager).transpose()
    }

    async fn delete_manager(&self, username: &Username) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let locked = sqlx::query("SELECT username FROM managers WHERE username = $1 FOR UPDATE")
            .bind(username.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock manager"))?;
        if locked.is_none() {
            return Err(DomainError::not_found("Manager", username));
        }

        let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups WHERE manager = $1")
            .bind(username.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("count groups"))?;
        if owned > 0 {
            return Err(DomainError::conflict(format!(
                "Manager '{}' still owns {} group(s)",
                username, owned
            )));
        }

        // The managers row cascades with the account.
        sqlx::query("DELETE FROM accounts WHERE username = $1")
            .bind(username.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete manager"))?;

        tx.commit().await.map_err(db_error("commit manager deletion"))?;
        Ok(())
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let role: Role = get_parsed(row, "role")?;
    Ok(Account::reconstitute(
        get_username(row, "username")?,
        get(row, "password_hash")?,
        role,
        get_timestamp(row, "created_at")?,
    ))
}

fn row_to_manager(row: &PgRow) -> Result<Manager, DomainError> {
    let group_limit: i32 = get(row, "group_limit")?;
    let group_limit = u32::try_from(group_limit)
        .map_err(|_| DomainError::database(format!("Invalid group_limit: {}", group_limit)))?;
    Ok(Manager::reconstitute(
        get_username(row, "username")?,
        group_limit,
        get_timestamp(row, "created_at")?,
    ))
}
