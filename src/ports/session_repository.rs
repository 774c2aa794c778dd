//! Provisioning session repository port.
//!
//! Sessions are short-lived: saved on start, updated as they move through
//! the workflow, and deleted when abandoned or finalized.

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::provisioning::{ProvisioningSession, SessionState};
use async_trait::async_trait;

/// Repository port for ProvisioningSession aggregates.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &ProvisioningSession) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<ProvisioningSession>, DomainError>;

    /// Update a session whose stored state is still `expected`.
    ///
    /// The state check makes concurrent transitions of one session
    /// first-writer-wins.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    /// - `Conflict` if the stored state is no longer `expected`
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        session: &ProvisioningSession,
        expected: SessionState,
    ) -> Result<(), DomainError>;

    /// Delete a session whose stored state is still `expected`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    /// - `Conflict` if the stored state is no longer `expected`
    async fn delete(&self, id: &SessionId, expected: SessionState) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
