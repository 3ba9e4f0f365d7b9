//! Percentages as exact fractions.

use crate::fraction::{Fraction, Rounding};
use crate::types::{BigInt, BIPS_BASE};
use std::cmp::Ordering;
use std::fmt;

/// A [`Fraction`] read as a share of one; `Percent::new(1, 2)` is 50%.
///
/// Comparisons are plain fraction comparisons. Only rendering multiplies by 100.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Fraction);

impl Percent {
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        Self(Fraction::new(numerator, denominator))
    }

    /// Percentage expressed in basis points, e.g. `from_bips(50)` is 0.5%.
    pub fn from_bips(bips: u32) -> Self {
        Self::new(bips, BIPS_BASE)
    }

    pub fn zero() -> Self {
        Self(Fraction::zero())
    }

    /// 100%.
    pub fn one_hundred() -> Self {
        Self(Fraction::one())
    }

    pub fn as_fraction(&self) -> &Fraction {
        &self.0
    }

    pub fn into_fraction(self) -> Fraction {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn add(&self, other: &Percent) -> Percent {
        Percent(&self.0 + &other.0)
    }

    pub fn subtract(&self, other: &Percent) -> Percent {
        Percent(&self.0 - &other.0)
    }

    pub fn multiply(&self, other: &Fraction) -> Percent {
        Percent(&self.0 * other)
    }

    /// Panics if `other` is zero.
    pub fn divide(&self, other: &Fraction) -> Percent {
        Percent(&self.0 / other)
    }

    pub fn less_than(&self, other: &Percent) -> bool {
        self.0.less_than(&other.0)
    }

    pub fn equal_to(&self, other: &Percent) -> bool {
        self.0.equal_to(&other.0)
    }

    pub fn greater_than(&self, other: &Percent) -> bool {
        self.0.greater_than(&other.0)
    }

    pub fn compare(&self, other: &Percent) -> Ordering {
        self.0.cmp(&other.0)
    }

    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> String {
        self.scaled().to_significant(significant_digits, rounding)
    }

    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.scaled().to_fixed(decimal_places, rounding)
    }

    fn scaled(&self) -> Fraction {
        &self.0 * &Fraction::from_integer(100)
    }
}

impl From<Fraction> for Percent {
    fn from(fraction: Fraction) -> Self {
        Self(fraction)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_fixed(2, Rounding::RoundHalfUp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_subtract() {
        let sum = Percent::new(1, 100).add(&Percent::new(2, 100));
        assert_eq!(sum, Percent::new(3, 100));

        let difference = Percent::new(1, 25).subtract(&Percent::new(2, 100));
        assert_eq!(difference, Percent::new(2, 100));
    }

    #[test]
    fn test_multiply_divide() {
        let product = Percent::new(1, 100).multiply(&Fraction::new(2, 1));
        assert_eq!(product, Percent::new(2, 100));

        let quotient = Percent::new(1, 25).divide(&Fraction::new(2, 1));
        assert_eq!(quotient, Percent::new(2, 100));
    }

    #[test]
    fn test_from_bips() {
        assert_eq!(Percent::from_bips(50), Percent::new(1, 200));
        assert_eq!(Percent::from_bips(10_000), Percent::one_hundred());
    }

    #[test]
    fn test_comparison_is_not_scaled() {
        assert!(Percent::new(1, 100).less_than(&Percent::new(2, 100)));
        assert!(Percent::new(1, 2).equal_to(&Percent::new(50, 100)));
        assert!(Percent::from_bips(500).greater_than(&Percent::from_bips(300)));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(Percent::new(154, 10_000).to_significant(3, Rounding::RoundDown), "1.54");
        assert_eq!(Percent::new(154, 10_000).to_fixed(2, Rounding::RoundDown), "1.54");
        assert_eq!(Percent::new(1, 3).to_fixed(2, Rounding::RoundHalfUp), "33.33");
        assert_eq!(Percent::from_bips(50).to_string(), "0.50%");
    }
}
