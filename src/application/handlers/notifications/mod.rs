//! Notification inbox query for managers.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError};
use crate::domain::notification::Notification;
use crate::ports::NotificationReader;

/// Most notifications returned by one listing.
pub const MAX_NOTIFICATIONS: usize = 200;

pub struct ListNotificationsHandler {
    reader: Arc<dyn NotificationReader>,
}

impl ListNotificationsHandler {
    pub fn new(reader: Arc<dyn NotificationReader>) -> Self {
        Self { reader }
    }

    /// The caller's notifications, newest first.
    pub async fn handle(
        &self,
        limit: Option<usize>,
        metadata: CommandMetadata,
    ) -> Result<Vec<Notification>, DomainError> {
        let limit = limit.unwrap_or(50).clamp(1, MAX_NOTIFICATIONS);
        self.reader.list_for_manager(&metadata.actor, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{as_manager, username, MANAGER};
    use crate::domain::notification::NotificationCategory;
    use crate::ports::NotificationSink;

    #[tokio::test]
    async fn returns_only_callers_notices_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        for (manager, message) in [(MANAGER, "first"), ("rival", "other"), (MANAGER, "second")] {
            store
                .notify(&Notification::new(
                    username(manager),
                    NotificationCategory::ServiceCreated,
                    message,
                ))
                .await
                .unwrap();
        }

        let notices = ListNotificationsHandler::new(store)
            .handle(None, as_manager(MANAGER))
            .await
            .unwrap();

        let messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }
}
