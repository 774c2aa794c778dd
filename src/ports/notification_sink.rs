//! Notification ports.
//!
//! Notifications are append-only and best-effort: callers log failures
//! from `notify` and carry on.

use crate::domain::foundation::{DomainError, Username};
use crate::domain::notification::Notification;
use async_trait::async_trait;

/// Write side: appends a notification.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Append a notification.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` or `UpstreamFailure` when delivery fails
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError>;
}

/// Read side: a manager's notifications.
#[async_trait]
pub trait NotificationReader: Send + Sync {
    /// Return up to `limit` notifications for a manager, newest first.
    async fn list_for_manager(
        &self,
        manager: &Username,
        limit: usize,
    ) -> Result<Vec<Notification>, DomainError>;
}
