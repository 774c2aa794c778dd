//! Cost estimate value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, UnitPrice};

/// Outcome of estimating a requested service's cost over the billing horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum CostEstimate {
    /// Priced from a unit price and a number of billing units.
    Priced {
        amount: Money,
        unit_price: UnitPrice,
        units: u64,
    },
    /// No pricing model or no price; treated as free and always authorized.
    Unestimable,
}

impl CostEstimate {
    /// Prices `units` billing units at `unit_price`.
    pub fn priced(unit_price: UnitPrice, units: u64) -> Self {
        CostEstimate::Priced {
            amount: unit_price.cost_for(units),
            unit_price,
            units,
        }
    }

    /// The amount to debit on finalize.
    pub fn amount(&self) -> Money {
        match self {
            CostEstimate::Priced { amount, .. } => *amount,
            CostEstimate::Unestimable => Money::ZERO,
        }
    }

    pub fn is_unestimable(&self) -> bool {
        matches!(self, CostEstimate::Unestimable)
    }

    /// Authorization gate: does this estimate fit in `remaining`?
    pub fn fits_within(&self, remaining: Money) -> bool {
        match self {
            CostEstimate::Priced { amount, .. } => *amount <= remaining,
            CostEstimate::Unestimable => true,
        }
    }
}
