//! Manager entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, Username, ValidationError};

/// Largest group quota an administrator may grant a manager.
pub const MAX_GROUP_LIMIT: u32 = 100;

/// A manager: owns groups, up to `group_limit` of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    username: Username,
    group_limit: u32,
    created_at: Timestamp,
}

impl Manager {
    /// Creates a manager record.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `group_limit` is outside `1..=MAX_GROUP_LIMIT`
    pub fn new(username: Username, group_limit: u32) -> Result<Self, DomainError> {
        if group_limit == 0 || group_limit > MAX_GROUP_LIMIT {
            return Err(ValidationError::out_of_range(
                "group_limit",
                1,
                MAX_GROUP_LIMIT as i64,
                group_limit as i64,
            )
            .into());
        }
        Ok(Self {
            username,
            group_limit,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute a manager from persistence (no validation).
    pub fn reconstitute(username: Username, group_limit: u32, created_at: Timestamp) -> Self {
        Self {
            username,
            group_limit,
            created_at,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn group_limit(&self) -> u32 {
        self.group_limit
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Checks whether one more group fits in the quota.
    ///
    /// # Errors
    ///
    /// - `QuotaExceeded` if `owned` already reaches the limit
    pub fn ensure_can_own_another(&self, owned: usize) -> Result<(), DomainError> {
        if owned >= self.group_limit as usize {
            return Err(DomainError::quota_exceeded(&self.username, self.group_limit));
        }
        Ok(())
    }
}
