//! Integer price and quantity types
//!
//! The exchange quotes prices in whole currency units and sizes in whole
//! shares, so both are `i64` newtypes. Arithmetic is checked or saturating;
//! nothing here panics on overflow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A price in whole currency units.
///
/// Zero is a valid value: it is the "unknown" sentinel for derived prices and
/// the wire price of a market order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Create a strictly positive price (limit order prices).
    pub fn try_positive(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidPrice(value));
        }
        Ok(Self(value))
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Floored midpoint of two prices.
    ///
    /// Computed as `a + (b - a) / 2` with flooring division so it neither
    /// overflows nor rounds toward zero for negative sums.
    pub fn midpoint(a: Price, b: Price) -> Price {
        let (lo, hi) = if a <= b { (a.0, b.0) } else { (b.0, a.0) };
        let half_gap = ((hi as i128 - lo as i128) / 2) as i64;
        Price(lo + half_gap)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A share count. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Create a quantity, rejecting negative values.
    pub fn try_new(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::InvalidQuantity(value));
        }
        Ok(Self(value))
    }

    /// Create a quantity, clamping negative input to zero.
    pub fn clamped(value: i64) -> Self {
        Self(value.max(0))
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_price_try_positive() {
        assert_eq!(Price::try_positive(100).unwrap().value(), 100);
        assert_eq!(Price::try_positive(0), Err(DomainError::InvalidPrice(0)));
        assert_eq!(Price::try_positive(-5), Err(DomainError::InvalidPrice(-5)));
    }

    #[test]
    fn test_midpoint_floors() {
        assert_eq!(Price::midpoint(Price::new(101), Price::new(99)), Price::new(100));
        assert_eq!(Price::midpoint(Price::new(100), Price::new(101)), Price::new(100));
        assert_eq!(
            Price::midpoint(Price::new(58400), Price::new(58300)),
            Price::new(58350)
        );
    }

    #[test]
    fn test_midpoint_extremes_do_not_overflow() {
        let mid = Price::midpoint(Price::new(i64::MAX), Price::new(i64::MAX - 2));
        assert_eq!(mid, Price::new(i64::MAX - 1));
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert_eq!(Quantity::try_new(-1), Err(DomainError::InvalidQuantity(-1)));
        assert_eq!(Quantity::clamped(-1), Quantity::ZERO);
    }

    #[test]
    fn test_quantity_saturating_add() {
        let q = Quantity::clamped(i64::MAX).saturating_add(Quantity::clamped(10));
        assert_eq!(q.value(), i64::MAX);
    }

    proptest! {
        #[test]
        fn prop_midpoint_matches_floor_of_mean(a in 0i64..1_000_000_000, b in 0i64..1_000_000_000) {
            let expected = (a + b).div_euclid(2);
            prop_assert_eq!(Price::midpoint(Price::new(a), Price::new(b)).value(), expected);
        }
    }
}
