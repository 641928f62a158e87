//! Type-safe price representation using decimal arithmetic.
//!
//! The store only sells in US dollars, so a price is a bare [`Decimal`]
//! amount. Floats never touch money: catalog prices, cart totals and
//! purchase sums are all exact.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A USD amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Lossy conversion for JSON APIs that expose plain numbers.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.round_dp(2).to_f64().unwrap_or_default()
    }

    /// Whole-percent discount of `self` relative to an original price.
    ///
    /// Returns `None` when there is no discount (original not higher, or zero).
    ///
    /// ```
    /// use frost_core::Price;
    ///
    /// let diamond = Price::from_cents(4999);
    /// assert_eq!(diamond.discount_from(Price::from_cents(6999)), Some(29));
    /// assert_eq!(diamond.discount_from(diamond), None);
    /// ```
    #[must_use]
    pub fn discount_from(self, original: Self) -> Option<u32> {
        if original.0 <= self.0 || original.0.is_zero() {
            return None;
        }
        let percent = (original.0 - self.0) / original.0 * Decimal::ONE_HUNDRED;
        percent.round().to_u32().filter(|p| *p > 0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::str::FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(999).amount(), Decimal::new(999, 2));
        assert_eq!(Price::from_cents(-150).amount(), Decimal::new(-150, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(999).to_string(), "$9.99");
        assert_eq!(Price::new(Decimal::from(20)).to_string(), "$20.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_times_and_sum_are_exact() {
        let vip = Price::from_cents(999);
        assert_eq!(vip.times(2), Price::from_cents(1998));

        let total: Price = [vip, vip, Price::from_cents(2499)].into_iter().sum();
        assert_eq!(total, Price::from_cents(4497));
    }

    #[test]
    fn test_discount() {
        // Diamond rank: 49.99 from 69.99 is a 28.6% cut, shown as 29%.
        assert_eq!(
            Price::from_cents(4999).discount_from(Price::from_cents(6999)),
            Some(29)
        );
        assert_eq!(
            Price::from_cents(1999).discount_from(Price::from_cents(2999)),
            Some(33)
        );
        assert_eq!(
            Price::from_cents(500).discount_from(Price::from_cents(400)),
            None
        );
        assert_eq!(Price::from_cents(500).discount_from(Price::ZERO), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("9.99".parse::<Price>().unwrap(), Price::from_cents(999));
        assert_eq!(
            " $19.99 ".parse::<Price>().unwrap(),
            Price::from_cents(1999)
        );
        assert!("nine".parse::<Price>().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(999)).unwrap();
        assert_eq!(json, "\"9.99\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::from_cents(999));
    }
}
