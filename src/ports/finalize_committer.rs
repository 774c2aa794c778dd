//! Finalize committer port.
//!
//! Finalizing a session touches three collections: the group's budget,
//! the service records, and the sessions. They must change together or
//! not at all, so the whole unit is one port call.

use crate::domain::budget::BudgetUsage;
use crate::domain::foundation::{DomainError, Money};
use crate::domain::provisioning::ProvisioningSession;
use crate::domain::registry::ServiceRecord;
use async_trait::async_trait;

/// Everything one finalize writes.
#[derive(Debug, Clone)]
pub struct FinalizeCommit {
    /// The session as it was loaded, still `Authorized`.
    pub session: ProvisioningSession,
    /// The record to insert, keyed by the session id.
    pub record: ServiceRecord,
    /// Amount to debit from the session's group.
    pub amount: Money,
}

/// Port that applies a finalize as a single atomic unit.
///
/// Implementations must, all-or-nothing:
/// 1. fail `Conflict` if a record already exists for the session id
/// 2. fail `Conflict` if the session is gone or no longer `Authorized`
/// 3. debit the group (`InsufficientBudget` if it no longer fits)
/// 4. insert the record
/// 5. delete the session
///
/// A failure at any step leaves all three collections untouched, so the
/// caller can retry the same commit safely.
#[async_trait]
pub trait FinalizeCommitter: Send + Sync {
    /// Apply the commit, returning the group's budget usage afterwards.
    async fn commit(&self, commit: &FinalizeCommit) -> Result<BudgetUsage, DomainError>;
}
