//! Notification domain module.
//!
//! Append-only notices to managers about what happened in their groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, Username, ValidationError};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    ServiceCreated,
    ServiceDeleted,
    SessionDenied,
    BudgetAlert,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::ServiceCreated => "service_created",
            NotificationCategory::ServiceDeleted => "service_deleted",
            NotificationCategory::SessionDenied => "session_denied",
            NotificationCategory::BudgetAlert => "budget_alert",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service_created" => Ok(NotificationCategory::ServiceCreated),
            "service_deleted" => Ok(NotificationCategory::ServiceDeleted),
            "session_denied" => Ok(NotificationCategory::SessionDenied),
            "budget_alert" => Ok(NotificationCategory::BudgetAlert),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown notification category '{}'", other),
            )),
        }
    }
}

/// A notice addressed to one manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub manager: Username,
    pub category: NotificationCategory,
    pub message: String,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        manager: Username,
        category: NotificationCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            manager,
            category,
            message: message.into(),
            created_at: Timestamp::now(),
        }
    }
}
