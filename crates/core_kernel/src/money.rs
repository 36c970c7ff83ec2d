//! Money with precise decimal arithmetic
//!
//! All billed, paid, and adjusted amounts in the system are US-dollar values.
//! `Money` wraps `rust_decimal::Decimal` so calculations never touch floating
//! point; remittance reconciliation compares amounts at cent tolerance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A US-dollar monetary amount
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new amount
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount from whole cents
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Zero dollars
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// One cent - the reconciliation tolerance
    pub fn cent() -> Self {
        Self(dec!(0.01))
    }

    /// Returns the raw decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Rounds to whole cents (banker's rounding)
    pub fn round_to_cents(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Returns true if the two amounts differ by less than one cent
    pub fn reconciles_with(&self, other: Money) -> bool {
        (*self - other).abs() < Money::cent()
    }

    /// Subtraction floored at zero
    pub fn saturating_sub(&self, other: Money) -> Self {
        let diff = self.0 - other.0;
        if diff.is_sign_negative() {
            Money::zero()
        } else {
            Self(diff)
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Money {
        Money(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciles_within_cent() {
        let a = Money::new(dec!(300.00));
        let b = Money::new(dec!(299.995));
        assert!(a.reconciles_with(b));
    }

    #[test]
    fn test_does_not_reconcile_at_cent() {
        let a = Money::new(dec!(300.00));
        let b = Money::new(dec!(299.99));
        assert!(!a.reconciles_with(b));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let a = Money::new(dec!(100));
        let b = Money::new(dec!(250));
        assert_eq!(a.saturating_sub(b), Money::zero());
        assert_eq!(b.saturating_sub(a), Money::new(dec!(150)));
    }

    #[test]
    fn test_sum() {
        let total: Money = [dec!(10.50), dec!(20.25), dec!(0.25)]
            .into_iter()
            .map(Money::new)
            .sum();
        assert_eq!(total, Money::new(dec!(31.00)));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let m = Money::new(dec!(1234.565));
        assert_eq!(m.to_string(), "$1234.56");
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(12345), Money::new(dec!(123.45)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reconciliation_is_symmetric(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
                let a = Money::from_cents(a);
                let b = Money::from_cents(b);
                prop_assert_eq!(a.reconciles_with(b), b.reconciles_with(a));
            }

            #[test]
            fn saturating_sub_never_negative(a in 0i64..1_000_000, b in 0i64..1_000_000) {
                let diff = Money::from_cents(a).saturating_sub(Money::from_cents(b));
                prop_assert!(!diff.amount().is_sign_negative());
            }
        }
    }
}
