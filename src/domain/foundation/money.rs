//! Money and unit price value objects.
//!
//! Budgets and costs are whole cents; unit prices are micro-dollars per
//! billing unit. Neither type ever goes through floating point.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

const MICROS_PER_CENT: u128 = 10_000;
const MICROS_PER_DOLLAR: u64 = 1_000_000;

/// A non-negative amount of US dollars, stored as cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from a number of cents.
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole dollars.
    pub fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Returns true when the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Subtracts `other`, clamping at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Price of one billing unit (an hour, or one GB-month) in micro-dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPrice(u64);

impl UnitPrice {
    /// Creates a price from micro-dollars per unit.
    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Parses a decimal dollar string such as `"0.0416"`.
    ///
    /// At most six fractional digits are accepted.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for blank input
    /// - `InvalidFormat` for anything that is not a plain non-negative decimal
    pub fn parse_usd(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::empty_field("unit_price"));
        }

        let (whole, fraction) = match value.split_once('.') {
            Some((w, f)) => (w, f),
            None => (value, ""),
        };
        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || !digits_only(whole)
            || !digits_only(fraction)
        {
            return Err(ValidationError::invalid_format(
                "unit_price",
                format!("'{}' is not a decimal dollar amount", value),
            ));
        }
        if fraction.len() > 6 {
            return Err(ValidationError::invalid_format(
                "unit_price",
                "at most six decimal places are supported",
            ));
        }

        let overflow = || ValidationError::invalid_format("unit_price", "value is too large");
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction_micros: u64 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<6}", fraction);
            padded.parse().map_err(|_| overflow())?
        };

        whole
            .checked_mul(MICROS_PER_DOLLAR)
            .and_then(|m| m.checked_add(fraction_micros))
            .map(Self)
            .ok_or_else(overflow)
    }

    /// Returns the price in micro-dollars.
    pub fn micros(&self) -> u64 {
        self.0
    }

    /// Total cost of `units` billing units, rounded half-up to whole cents.
    pub fn cost_for(&self, units: u64) -> Money {
        let micros = self.0 as u128 * units as u128;
        let cents = (micros + MICROS_PER_CENT / 2) / MICROS_PER_CENT;
        Money(u64::try_from(cents).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}.{:06}",
            self.0 / MICROS_PER_DOLLAR,
            self.0 % MICROS_PER_DOLLAR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_displays_as_dollars() {
        assert_eq!(Money::from_cents(123_456).to_string(), "$1234.56");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn money_checked_sub_refuses_negative() {
        assert_eq!(Money::from_cents(3).checked_sub(Money::from_cents(4)), None);
        assert_eq!(
            Money::from_cents(10).checked_sub(Money::from_cents(4)),
            Some(Money::from_cents(6))
        );
    }

    #[test]
    fn money_serializes_as_cents() {
        assert_eq!(serde_json::to_string(&Money::from_dollars(5)).unwrap(), "500");
    }

    #[test]
    fn parse_usd_accepts_plain_decimals() {
        assert_eq!(UnitPrice::parse_usd("0.0416").unwrap().micros(), 41_600);
        assert_eq!(UnitPrice::parse_usd("2").unwrap().micros(), 2_000_000);
        assert_eq!(UnitPrice::parse_usd(".5").unwrap().micros(), 500_000);
    }

    #[test]
    fn parse_usd_rejects_malformed_input() {
        assert!(UnitPrice::parse_usd("").is_err());
        assert!(UnitPrice::parse_usd("-1").is_err());
        assert!(UnitPrice::parse_usd("1.2.3").is_err());
        assert!(UnitPrice::parse_usd("0.0000001").is_err());
        assert!(UnitPrice::parse_usd(".").is_err());
    }

    #[test]
    fn cost_for_rounds_half_up_to_cents() {
        // 0.0416 * 2160 = 89.856
        let hourly = UnitPrice::parse_usd("0.0416").unwrap();
        assert_eq!(hourly.cost_for(2160), Money::from_cents(8986));

        // 0.023 * 3072 = 70.656
        let storage = UnitPrice::parse_usd("0.023").unwrap();
        assert_eq!(storage.cost_for(3072), Money::from_cents(7066));
    }

    #[test]
    fn cost_for_zero_units_is_free() {
        assert!(UnitPrice::from_micros(999).cost_for(0).is_zero());
    }
}
