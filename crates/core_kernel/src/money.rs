//! Money with precise decimal arithmetic
//!
//! All monetary values in the system are Rand amounts backed by
//! rust_decimal, so premium and arrears calculations never go through
//! floating point. Amounts are non-negative by construction; the only
//! subtraction offered is the flooring kind used by arrears math.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0} (monetary values must be non-negative)")]
    Negative(Decimal),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A non-negative Rand amount
///
/// Stored with 2 decimal places (cents). Multi-currency handling is out of
/// scope for this system, so there is no currency field to mismatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value, rejecting negative amounts
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount.round_dp(2)))
    }

    /// Creates Money from an integer amount of cents
    pub fn from_cents(cents: u64) -> Self {
        Self(Decimal::new(cents as i64, 2))
    }

    /// Zero Rand
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Returns the underlying decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > dec!(0)
    }

    /// Adds two amounts
    pub fn checked_add(&self, other: &Money) -> Money {
        Self(self.0 + other.0)
    }

    /// Subtracts, flooring at zero
    ///
    /// Arrears are "amounts still owed": paying more than is due never
    /// produces a negative debt, it produces no debt.
    pub fn saturating_sub(&self, other: &Money) -> Money {
        if other.0 >= self.0 {
            Money::zero()
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Multiplies by a non-negative integer count (e.g. billing periods)
    pub fn times(&self, count: u32) -> Money {
        Self(self.0 * Decimal::from(count))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, count: u32) -> Self {
        self.times(count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50)).unwrap();
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            Money::new(dec!(-1)),
            Err(MoneyError::Negative(dec!(-1)))
        );
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(30000).amount(), dec!(300.00));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let owed = Money::new(dec!(100)).unwrap();
        let paid = Money::new(dec!(250)).unwrap();
        assert_eq!(owed.saturating_sub(&paid), Money::zero());
        assert_eq!(paid.saturating_sub(&owed).amount(), dec!(150));
    }

    #[test]
    fn test_times() {
        let premium = Money::new(dec!(50)).unwrap();
        assert_eq!(premium.times(3).amount(), dec!(150));
        assert_eq!(premium.times(0), Money::zero());
    }

    #[test]
    fn test_display() {
        let m = Money::new(dec!(300)).unwrap();
        assert_eq!(m.to_string(), "R300.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn saturating_sub_never_negative(a in 0u64..1_000_000_000u64, b in 0u64..1_000_000_000u64) {
            let ma = Money::from_cents(a);
            let mb = Money::from_cents(b);
            prop_assert!(!ma.saturating_sub(&mb).amount().is_sign_negative());
        }

        #[test]
        fn sum_matches_fold(amounts in proptest::collection::vec(0u64..1_000_000u64, 0..20)) {
            let total: Money = amounts.iter().map(|&c| Money::from_cents(c)).sum();
            let expected = amounts.iter().map(|&c| Money::from_cents(c))
                .fold(Money::zero(), |acc, m| acc + m);
            prop_assert_eq!(total, expected);
        }
    }
}
