//! Account repository port.
//!
//! Persists login accounts and the manager records attached to
//! `manager`-tagged accounts.
//!
//! # Design
//!
//! - **Username-keyed**: usernames are unique across all roles
//! - **Paired writes**: a manager record and its account are created and
//!   deleted together

use crate::domain::directory::{Account, Manager};
use crate::domain::foundation::{DomainError, Username};
use async_trait::async_trait;

/// Repository port for accounts and managers.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Save a new account.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the username is taken
    /// - `DatabaseError` on persistence failure
    async fn save_account(&self, account: &Account) -> Result<(), DomainError>;

    /// Find an account by username.
    async fn find_account(&self, username: &Username) -> Result<Option<Account>, DomainError>;

    /// Delete a non-manager account and drop its group membership, if any.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such account exists
    /// - `DatabaseError` on persistence failure
    async fn delete_account(&self, username: &Username) -> Result<(), DomainError>;

    /// Save a manager together with its login account, as one write.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the username is taken
    /// - `DatabaseError` on persistence failure
    async fn save_manager(&self, manager: &Manager, account: &Account) -> Result<(), DomainError>;

    /// Find a manager by username.
    async fn find_manager(&self, username: &Username) -> Result<Option<Manager>, DomainError>;

    /// Delete a manager and its login account.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such manager exists
    /// - `Conflict` if the manager still owns groups
    /// - `DatabaseError` on persistence failure
    async fn delete_manager(&self, username: &Username) -> Result<(), DomainError>;
}
