//! Best-effort notification delivery.
//!
//! Notifications never decide the outcome of the operation that raised
//! them: a sink failure is logged and swallowed.

use std::sync::Arc;

use crate::domain::directory::Group;
use crate::domain::foundation::{GroupId, Username};
use crate::domain::notification::{Notification, NotificationCategory};
use crate::ports::{GroupRepository, NotificationSink};

/// Wraps a [`NotificationSink`] so delivery failures are only logged.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    groups: Arc<dyn GroupRepository>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { sink, groups }
    }

    /// Sends `message` to `manager`, logging instead of failing.
    pub async fn notify(
        &self,
        manager: &Username,
        category: NotificationCategory,
        message: impl Into<String>,
    ) {
        let notification = Notification::new(manager.clone(), category, message);
        if let Err(e) = self.sink.notify(&notification).await {
            tracing::warn!(
                manager = %manager,
                category = %category,
                error = %e,
                "Failed to deliver notification"
            );
        }
    }

    /// Sends a message built from the group to the group's manager.
    ///
    /// A group that has since been deleted is skipped.
    pub async fn notify_group_manager<F>(
        &self,
        group_id: &GroupId,
        category: NotificationCategory,
        message: F,
    ) where
        F: FnOnce(&Group) -> String + Send,
    {
        match self.groups.find_by_id(group_id).await {
            Ok(Some(group)) => {
                self.notify(group.manager(), category, message(&group)).await;
            }
            Ok(None) => {
                tracing::warn!(
                    group_id = %group_id,
                    category = %category,
                    "Group gone, notification dropped"
                );
            }
            Err(e) => {
                tracing::warn!(
                    group_id = %group_id,
                    category = %category,
                    error = %e,
                    "Failed to resolve group manager for notification"
                );
            }
        }
    }
}
