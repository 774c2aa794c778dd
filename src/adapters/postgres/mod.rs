//! PostgreSQL adapters - database implementations of the store ports.
//!
//! - `PostgresAccountRepository` - accounts and managers
//! - `PostgresGroupRepository` - groups and the membership index
//! - `PostgresBudgetRepository` - allocations and the atomic debit
//! - `PostgresSessionRepository` - in-flight provisioning sessions
//! - `PostgresServiceRecordRepository` - provisioned service records
//! - `PostgresFinalizeCommitter` - the transactional finalize
//! - `PostgresNotificationStore` - manager notifications
//!
//! The schema lives in `migrations/` and is applied at startup.

mod account_repository;
mod budget_repository;
mod finalize_committer;
mod group_repository;
mod notification_store;
mod service_record_repository;
mod session_repository;
mod support;

pub use account_repository::PostgresAccountRepository;
pub use budget_repository::PostgresBudgetRepository;
pub use finalize_committer::PostgresFinalizeCommitter;
pub use group_repository::PostgresGroupRepository;
pub use notification_store::PostgresNotificationStore;
pub use service_record_repository::PostgresServiceRecordRepository;
pub use session_repository::PostgresSessionRepository;
