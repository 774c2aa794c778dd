//! PostgreSQL implementation of GroupRepository.
//!
//! Membership lives in `group_members`, whose primary key on `username`
//! enforces one group per user.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::collections::BTreeSet;

use super::support::{
    db_error, get, get_timestamp, get_username, is_foreign_key_violation, is_unique_violation,
};
use crate::domain::directory::Group;
use crate::domain::foundation::{DomainError, GroupId, Username};
use crate::ports::GroupRepository;

const SELECT_GROUPS: &str = r#"
    SELECT g.id, g.manager, g.name, g.created_at, g.updated_at,
           COALESCE(array_agg(m.username) FILTER (WHERE m.username IS NOT NULL), '{}') AS members
    FROM groups g
    LEFT JOIN group_members m ON m.group_id = g.id
"#;

/// PostgreSQL implementation of GroupRepository.
#[derive(Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn name_taken(group: &Group) -> DomainError {
    DomainError::conflict(format!(
        "Manager '{}' already has a group named '{}'",
        group.manager(),
        group.name()
    ))
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create(&self, group: &Group, group_limit: u32) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        // Serializes concurrent creates by the same manager.
        let locked = sqlx::query("SELECT username FROM managers WHERE username = $1 FOR UPDATE")
            .bind(group.manager().as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock manager"))?;
        if locked.is_none() {
            return Err(DomainError::not_found("Manager", group.manager()));
        }

        let taken = sqlx::query("SELECT 1 FROM groups WHERE manager = $1 AND name = $2")
            .bind(group.manager().as_str())
            .bind(group.name())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("check group name"))?;
        if taken.is_some() {
            return Err(name_taken(group));
        }

        let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups WHERE manager = $1")
            .bind(group.manager().as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("count groups"))?;
        if owned >= i64::from(group_limit) {
            return Err(DomainError::quota_exceeded(group.manager(), group_limit));
        }

        sqlx::query(
            r#"
            INSERT INTO groups (id, manager, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.manager().as_str())
        .bind(group.name())
        .bind(group.created_at().as_datetime())
        .bind(group.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                name_taken(group)
            } else {
                db_error("insert group")(e)
            }
        })?;

        tx.commit().await.map_err(db_error("commit group"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, DomainError> {
        let query = format!("{} WHERE g.id = $1 GROUP BY g.id", SELECT_GROUPS);
        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch group"))?;

        row.as_ref().map(row_to_group).transpose()
    }

    async fn list_by_manager(&self, manager: &Username) -> Result<Vec<Group>, DomainError> {
        let query = format!(
            "{} WHERE g.manager = $1 GROUP BY g.id ORDER BY g.name",
            SELECT_GROUPS
        );
        let rows = sqlx::query(&query)
            .bind(manager.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list groups"))?;

        rows.iter().map(row_to_group).collect()
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let row = sqlx::query("SELECT name FROM groups WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("lock group"))?;
        let Some(row) = row else {
            return Err(DomainError::not_found("Group", id));
        };
        let name: String = get(&row, "name")?;

        let (members,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
                .bind(id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("count members"))?;
        if members > 0 {
            return Err(DomainError::conflict(format!(
                "Group '{}' still has {} member(s)",
                name, members
            )));
        }

        // The budget row cascades with the group.
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete group"))?;

        tx.commit().await.map_err(db_error("commit group deletion"))?;
        Ok(())
    }

    async fn add_member(&self, id: &GroupId, username: &Username) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO group_members (username, group_id) VALUES ($1, $2)")
            .bind(username.as_str())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(format!("User '{}' already belongs to a group", username))
                } else if is_foreign_key_violation(&e) {
                    DomainError::not_found("Group", id)
                } else {
                    db_error("add member")(e)
                }
            })?;

        sqlx::query("UPDATE groups SET updated_at = now() WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("touch group"))?;
        Ok(())
    }

    async fn remove_member(&self, id: &GroupId, username: &Username) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM group_members WHERE username = $1 AND group_id = $2")
            .bind(username.as_str())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("remove member"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Group member", username).with_detail("group_id", id.to_string()));
        }
        Ok(())
    }

    async fn find_group_of(&self, username: &Username) -> Result<Option<GroupId>, DomainError> {
        let row: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT group_id FROM group_members WHERE username = $1")
                .bind(username.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch membership"))?;

        Ok(row.map(|(id,)| GroupId::from_uuid(id)))
    }
}

fn row_to_group(row: &PgRow) -> Result<Group, DomainError> {
    let id: uuid::Uuid = get(row, "id")?;
    let member_names: Vec<String> = get(row, "members")?;
    let members = member_names
        .into_iter()
        .map(|name| {
            Username::new(name)
                .map_err(|e| DomainError::database(format!("Invalid member in row: {}", e)))
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Group::reconstitute(
        GroupId::from_uuid(id),
        get_username(row, "manager")?,
        get(row, "name")?,
        members,
        get_timestamp(row, "created_at")?,
        get_timestamp(row, "updated_at")?,
    ))
}
