//! DeleteManagerHandler - administrators remove managers without groups.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError, Username};
use crate::ports::AccountRepository;

pub struct DeleteManagerHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl DeleteManagerHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// # Errors
    ///
    /// - `NotFound` if no such manager exists
    /// - `Conflict` while the manager still owns groups
    pub async fn handle(
        &self,
        username: Username,
        metadata: CommandMetadata,
    ) -> Result<(), DomainError> {
        self.accounts.delete_manager(&username).await?;
        tracing::info!(username = %username, deleted_by = %metadata.actor, "Manager deleted");
        Ok(())
    }
}
