//! In-memory store adapter.
//!
//! Implements every store port over one set of tables behind a single
//! async mutex. Holding that one lock for a whole call makes each port
//! method atomic, including the multi-table finalize commit.
//!
//! Used when no database is configured, and throughout the tests. Data
//! does not survive a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::budget::{Budget, BudgetUsage};
use crate::domain::directory::{Account, Group, Manager};
use crate::domain::foundation::{DomainError, GroupId, Money, SessionId, Username};
use crate::domain::notification::Notification;
use crate::domain::provisioning::{ProvisioningSession, SessionState};
use crate::domain::registry::{ServiceRecord, ServiceStatus};
use crate::ports::{
    AccountRepository, BudgetRepository, FinalizeCommit, FinalizeCommitter, GroupRepository,
    NotificationReader, NotificationSink, ServiceFilter, ServiceRecordRepository,
    SessionRepository,
};

#[derive(Default)]
struct Tables {
    accounts: HashMap<Username, Account>,
    managers: HashMap<Username, Manager>,
    groups: HashMap<GroupId, Group>,
    memberships: HashMap<Username, GroupId>,
    budgets: HashMap<GroupId, Budget>,
    sessions: HashMap<SessionId, ProvisioningSession>,
    records: HashMap<SessionId, ServiceRecord>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn debit(&mut self, group_id: &GroupId, amount: Money) -> Result<BudgetUsage, DomainError> {
        let budget = self
            .budgets
            .get_mut(group_id)
            .ok_or_else(|| DomainError::not_found("Budget", group_id))?;
        budget.debit(amount)?;
        Ok(budget.usage())
    }

    fn ensure_session_state(
        &self,
        id: &SessionId,
        expected: SessionState,
    ) -> Result<(), DomainError> {
        let stored = self
            .sessions
            .get(id)
            .ok_or_else(|| DomainError::not_found("Session", id))?;
        if stored.state() != expected {
            return Err(DomainError::conflict(format!(
                "Session {} is {}, expected {}",
                id,
                stored.state(),
                expected
            )));
        }
        Ok(())
    }
}

/// In-memory implementation of all store ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of in-flight sessions (for test assertions).
    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }

    /// Number of service records in any status (for test assertions).
    pub async fn record_count(&self) -> usize {
        self.tables.lock().await.records.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Accounts
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn save_account(&self, account: &Account) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        if tables.accounts.contains_key(account.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' is already taken",
                account.username()
            )));
        }
        tables
            .accounts
            .insert(account.username().clone(), account.clone());
        Ok(())
    }

    async fn find_account(&self, username: &Username) -> Result<Option<Account>, DomainError> {
        Ok(self.tables.lock().await.accounts.get(username).cloned())
    }

    async fn delete_account(&self, username: &Username) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        if tables.accounts.remove(username).is_none() {
            return Err(DomainError::not_found("Account", username));
        }
        if let Some(group_id) = tables.memberships.remove(username) {
            if let Some(group) = tables.groups.get_mut(&group_id) {
                group.remove_member(username)?;
            }
        }
        Ok(())
    }

    async fn save_manager(&self, manager: &Manager, account: &Account) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        if tables.accounts.contains_key(account.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' is already taken",
                account.username()
            )));
        }
        tables
            .accounts
            .insert(account.username().clone(), account.clone());
        tables
            .managers
            .insert(manager.username().clone(), manager.clone());
        Ok(())
    }

    async fn find_manager(&self, username: &Username) -> Result<Option<Manager>, DomainError> {
        Ok(self.tables.lock().await.managers.get(username).cloned())
    }

    async fn delete_manager(&self, username: &Username) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        if !tables.managers.contains_key(username) {
            return Err(DomainError::not_found("Manager", username));
        }
        let owned = tables
            .groups
            .values()
            .filter(|g| g.is_owned_by(username))
            .count();
        if owned > 0 {
            return Err(DomainError::conflict(format!(
                "Manager '{}' still owns {} group(s)",
                username, owned
            )));
        }
        tables.managers.remove(username);
        tables.accounts.remove(username);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Groups
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn create(&self, group: &Group, group_limit: u32) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        let owned: Vec<&Group> = tables
            .groups
            .values()
            .filter(|g| g.is_owned_by(group.manager()))
            .collect();
        if owned.iter().any(|g| g.name() == group.name()) {
            return Err(DomainError::conflict(format!(
                "Manager '{}' already has a group named '{}'",
                group.manager(),
                group.name()
            )));
        }
        if owned.len() >= group_limit as usize {
            return Err(DomainError::quota_exceeded(group.manager(), group_limit));
        }
        tables.groups.insert(*group.id(), group.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<Group>, DomainError> {
        Ok(self.tables.lock().await.groups.get(id).cloned())
    }

    async fn list_by_manager(&self, manager: &Username) -> Result<Vec<Group>, DomainError> {
        let tables = self.tables.lock().await;
        let mut groups: Vec<Group> = tables
            .groups
            .values()
            .filter(|g| g.is_owned_by(manager))
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(groups)
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        let group = tables
            .groups
            .get(id)
            .ok_or_else(|| DomainError::not_found("Group", id))?;
        if !group.members().is_empty() {
            return Err(DomainError::conflict(format!(
                "Group '{}' still has {} member(s)",
                group.name(),
                group.members().len()
            )));
        }
        tables.groups.remove(id);
        tables.budgets.remove(id);
        Ok(())
    }

    async fn add_member(&self, id: &GroupId, username: &Username) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        if let Some(current) = tables.memberships.get(username) {
            return Err(DomainError::conflict(format!(
                "User '{}' already belongs to group {}",
                username, current
            )));
        }
        let group = tables
            .groups
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Group", id))?;
        group.add_member(username.clone())?;
        tables.memberships.insert(username.clone(), *id);
        Ok(())
    }

    async fn remove_member(&self, id: &GroupId, username: &Username) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        let group = tables
            .groups
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Group", id))?;
        group.remove_member(username)?;
        tables.memberships.remove(username);
        Ok(())
    }

    async fn find_group_of(&self, username: &Username) -> Result<Option<GroupId>, DomainError> {
        Ok(self.tables.lock().await.memberships.get(username).copied())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Budgets
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl BudgetRepository for InMemoryStore {
    async fn allocate(&self, budget: &Budget) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        if !tables.groups.contains_key(budget.group_id()) {
            return Err(DomainError::not_found("Group", budget.group_id()));
        }
        if tables.budgets.contains_key(budget.group_id()) {
            return Err(DomainError::conflict(format!(
                "Group {} already has a budget",
                budget.group_id()
            )));
        }
        tables.budgets.insert(*budget.group_id(), budget.clone());
        Ok(())
    }

    async fn find(&self, group_id: &GroupId) -> Result<Option<Budget>, DomainError> {
        Ok(self.tables.lock().await.budgets.get(group_id).cloned())
    }

    async fn revise(&self, group_id: &GroupId, new_total: Money) -> Result<Budget, DomainError> {
        let mut tables = self.tables.lock().await;
        let budget = tables
            .budgets
            .get_mut(group_id)
            .ok_or_else(|| DomainError::not_found("Budget", group_id))?;
        budget.revise(new_total)?;
        Ok(budget.clone())
    }

    async fn debit(&self, group_id: &GroupId, amount: Money) -> Result<BudgetUsage, DomainError> {
        self.tables.lock().await.debit(group_id, amount)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Sessions
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn save(&self, session: &ProvisioningSession) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        tables.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<ProvisioningSession>, DomainError> {
        Ok(self.tables.lock().await.sessions.get(id).cloned())
    }

    async fn update(
        &self,
        session: &ProvisioningSession,
        expected: SessionState,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_session_state(session.id(), expected)?;
        tables.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId, expected: SessionState) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        tables.ensure_session_state(id, expected)?;
        tables.sessions.remove(id);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Service records
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl ServiceRecordRepository for InMemoryStore {
    async fn find_by_session(&self, id: &SessionId) -> Result<Option<ServiceRecord>, DomainError> {
        Ok(self.tables.lock().await.records.get(id).cloned())
    }

    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<ServiceRecord>, DomainError> {
        let tables = self.tables.lock().await;
        let mut records: Vec<ServiceRecord> = tables
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at().as_datetime().cmp(a.created_at().as_datetime()));
        Ok(records)
    }

    async fn update_status(
        &self,
        record: &ServiceRecord,
        expected: ServiceStatus,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .records
            .get_mut(record.session_id())
            .ok_or_else(|| DomainError::not_found("Service", record.session_id()))?;
        if stored.status() != expected {
            return Err(DomainError::conflict(format!(
                "Service {} is {}, expected {}",
                record.session_id(),
                stored.status(),
                expected
            )));
        }
        *stored = record.clone();
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Finalize
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl FinalizeCommitter for InMemoryStore {
    async fn commit(&self, commit: &FinalizeCommit) -> Result<BudgetUsage, DomainError> {
        let mut tables = self.tables.lock().await;
        let session_id = commit.session.id();

        if tables.records.contains_key(session_id) {
            return Err(DomainError::conflict(format!(
                "Session {} has already been finalized",
                session_id
            )));
        }
        tables.ensure_session_state(session_id, SessionState::Authorized)?;

        // Debit is the only step that can fail, so nothing is left to undo.
        let usage = tables.debit(commit.session.group_id(), commit.amount)?;
        tables
            .records
            .insert(*session_id, commit.record.clone());
        tables.sessions.remove(session_id);
        Ok(usage)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Notifications
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl NotificationSink for InMemoryStore {
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError> {
        self.tables
            .lock()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationReader for InMemoryStore {
    async fn list_for_manager(
        &self,
        manager: &Username,
        limit: usize,
    ) -> Result<Vec<Notification>, DomainError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.manager == manager)
            .take(limit)
            .cloned()
            .collect())
    }
}
