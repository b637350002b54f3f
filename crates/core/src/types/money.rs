//! Money handling for wire prices.
//!
//! The commerce API transports every price as a decimal-in-a-string
//! (`"499.00"`), which preserves precision but is useless for arithmetic.
//! [`Money`] parses that into a [`Decimal`] once, at the normalization
//! boundary, and everything downstream works with real decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a wire price string.
#[derive(Debug, Error)]
#[error("invalid price string {value:?}: {source}")]
pub struct PriceParseError {
    /// The offending wire value.
    pub value: String,
    source: rust_decimal::Error,
}

/// A monetary amount in the store currency (INR).
///
/// Stored in major units (rupees); [`Money::minor_units`] converts to the
/// paise amounts payment gateways expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from a decimal amount in major units.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a wire price string (e.g. `"499.00"`).
    ///
    /// # Errors
    ///
    /// Returns `PriceParseError` if the string is not a valid decimal.
    pub fn parse(value: &str) -> Result<Self, PriceParseError> {
        value
            .trim()
            .parse::<Decimal>()
            .map(Self)
            .map_err(|source| PriceParseError {
                value: value.to_string(),
                source,
            })
    }

    /// The amount in major units.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in minor units (paise), rounded to the nearest unit.
    ///
    /// Payment gateways take integer minor units; `499.00` becomes `49900`.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.0 * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .unwrap_or(0)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Add two amounts.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Apply a percentage discount (e.g. `10` takes 10% off).
    #[must_use]
    pub fn less_percent(&self, percent: Decimal) -> Self {
        Self(self.0 - (self.0 * percent / Decimal::ONE_HUNDRED))
    }

    /// Format for display (e.g. `"₹499.00"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("\u{20b9}{:.2}", self.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_wire_price() {
        let money = Money::parse("499.00").expect("valid price");
        assert_eq!(money.amount(), Decimal::new(49900, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("four hundred").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::parse("499.00").expect("price").minor_units(), 49900);
        assert_eq!(Money::parse("0.50").expect("price").minor_units(), 50);
        assert_eq!(Money::ZERO.minor_units(), 0);
    }

    #[test]
    fn test_times_and_plus() {
        let unit = Money::parse("100.00").expect("price");
        let line = unit.times(2);
        assert_eq!(line.minor_units(), 20000);
        assert_eq!(line.plus(unit).minor_units(), 30000);
    }

    #[test]
    fn test_less_percent() {
        let unit = Money::parse("200.00").expect("price");
        let discounted = unit.less_percent(Decimal::from(25));
        assert_eq!(discounted.minor_units(), 15000);
    }

    #[test]
    fn test_display() {
        let money = Money::parse("499.5").expect("price");
        assert_eq!(money.display(), "\u{20b9}499.50");
    }
}
