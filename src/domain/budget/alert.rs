//! Budget usage alert policy.

use super::BudgetUsage;
use crate::domain::foundation::Money;

/// Usage percentage at which the group's manager is warned.
pub const DEFAULT_ALERT_THRESHOLD_PERCENT: u8 = 75;

/// Decides when a debit deserves a usage alert.
///
/// An alert fires on the debit that moves usage from below the threshold
/// to at-or-above it, so a manager gets one warning per crossing rather
/// than one per provisioned service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAlertPolicy {
    threshold_percent: u8,
}

impl BudgetAlertPolicy {
    pub fn new(threshold_percent: u8) -> Self {
        Self {
            threshold_percent: threshold_percent.min(100),
        }
    }

    pub fn threshold_percent(&self) -> u8 {
        self.threshold_percent
    }

    /// True when `usage` is at or past the threshold.
    pub fn is_reached(&self, usage: &BudgetUsage) -> bool {
        if usage.total.is_zero() {
            return false;
        }
        usage.used.cents() as u128 * 100
            >= usage.total.cents() as u128 * self.threshold_percent as u128
    }

    /// True when a debit of `debited` produced `after` and crossed the threshold.
    pub fn crossed_by(&self, after: &BudgetUsage, debited: Money) -> bool {
        let before = BudgetUsage {
            used: after.used.saturating_sub(debited),
            remaining: after.remaining.checked_add(debited).unwrap_or(after.total),
            ..*after
        };
        !self.is_reached(&before) && self.is_reached(after)
    }

    /// Message sent to the manager.
    pub fn message(&self, group_name: &str, usage: &BudgetUsage) -> String {
        format!(
            "Alert: Group '{}' has used {}% of its allocated budget of {}. Current usage: {}",
            group_name, self.threshold_percent, usage.total, usage.used
        )
    }
}

impl Default for BudgetAlertPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::GroupId;

    fn usage(total: u64, used: u64) -> BudgetUsage {
        BudgetUsage {
            group_id: GroupId::new(),
            total: Money::from_cents(total),
            used: Money::from_cents(used),
            remaining: Money::from_cents(total - used),
        }
    }

    #[test]
    fn reached_at_exactly_threshold() {
        let policy = BudgetAlertPolicy::default();
        assert!(policy.is_reached(&usage(1000, 750)));
        assert!(!policy.is_reached(&usage(1000, 749)));
    }

    #[test]
    fn zero_budget_never_alerts() {
        assert!(!BudgetAlertPolicy::default().is_reached(&usage(0, 0)));
    }

    #[test]
    fn crossing_fires_once() {
        let policy = BudgetAlertPolicy::default();
        assert!(policy.crossed_by(&usage(1000, 800), Money::from_cents(300)));
        assert!(!policy.crossed_by(&usage(1000, 900), Money::from_cents(100)));
        assert!(!policy.crossed_by(&usage(1000, 500), Money::from_cents(100)));
    }

    #[test]
    fn message_names_group_and_amounts() {
        let msg = BudgetAlertPolicy::default().message("research", &usage(100_000, 80_000));
        assert!(msg.contains("research"));
        assert!(msg.contains("75%"));
        assert!(msg.contains("$1000.00"));
        assert!(msg.contains("$800.00"));
    }
}
