//! Exact rational numbers over arbitrary-precision integers.
//!
//! Every amount, price and percentage in the SDK is ultimately a [`Fraction`].
//! Fractions are never reduced and never converted to floating point: ordering
//! uses cross multiplication and display formatting rounds on integers.

use crate::types::BigInt;
use num_bigint::BigUint;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Rounding applied when a fraction is rendered or truncated to an integer.
///
/// Modes act on the magnitude, so `RoundUp` moves away from zero for
/// negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rounding {
    /// Truncate toward zero.
    #[default]
    RoundDown,
    /// Round to nearest, ties away from zero.
    RoundHalfUp,
    /// Round away from zero whenever there is a remainder.
    RoundUp,
}

/// A rational number `numerator / denominator`.
///
/// The denominator is kept positive; the sign lives in the numerator.
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Create a new fraction. Panics if the denominator is zero.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        let numerator = numerator.into();
        let denominator = denominator.into();
        assert!(!denominator.is_zero(), "fraction denominator cannot be zero");
        if denominator.is_negative() {
            Self {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Self {
                numerator,
                denominator,
            }
        }
    }

    /// Create a fraction with denominator one.
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// Integer part, truncated toward zero.
    pub fn quotient(&self) -> BigInt {
        &self.numerator / &self.denominator
    }

    /// Integer part rounded with the given mode.
    pub fn quotient_rounded(&self, rounding: Rounding) -> BigInt {
        let magnitude = div_round(
            self.numerator.magnitude(),
            self.denominator.magnitude(),
            rounding,
        );
        BigInt::from_biguint(self.numerator.sign(), magnitude)
    }

    /// What is left after removing the quotient, over the same denominator.
    pub fn remainder(&self) -> Fraction {
        Fraction {
            numerator: &self.numerator % &self.denominator,
            denominator: self.denominator.clone(),
        }
    }

    /// Swap numerator and denominator. Panics if the fraction is zero.
    pub fn invert(&self) -> Fraction {
        Fraction::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Division that reports a zero divisor instead of panicking.
    pub fn checked_div(&self, other: &Fraction) -> Option<Fraction> {
        if other.is_zero() {
            return None;
        }
        Some(self / other)
    }

    pub fn less_than(&self, other: &Fraction) -> bool {
        self.cmp(other) == Ordering::Less
    }

    pub fn equal_to(&self, other: &Fraction) -> bool {
        self.cmp(other) == Ordering::Equal
    }

    pub fn greater_than(&self, other: &Fraction) -> bool {
        self.cmp(other) == Ordering::Greater
    }

    /// Render with `significant_digits` significant digits, trailing zeros trimmed.
    ///
    /// Panics if `significant_digits` is zero.
    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> String {
        assert!(significant_digits > 0, "significant digits must be positive");
        let numerator = self.numerator.magnitude();
        let denominator = self.denominator.magnitude();
        if numerator.is_zero() {
            return "0".to_string();
        }

        // Find e with 10^e <= n/d < 10^(e+1).
        let mut exponent = decimal_len(numerator) as i64 - decimal_len(denominator) as i64;
        let (lhs, rhs) = if exponent >= 0 {
            (numerator.clone(), denominator * pow10(exponent as u32))
        } else {
            (numerator * pow10((-exponent) as u32), denominator.clone())
        };
        if lhs < rhs {
            exponent -= 1;
        }

        let scale = significant_digits as i64 - 1 - exponent;
        let digits = if scale >= 0 {
            div_round(&(numerator * pow10(scale as u32)), denominator, rounding)
        } else {
            div_round(numerator, &(denominator * pow10((-scale) as u32)), rounding)
        };

        let rendered = if scale > 0 {
            trim_fraction_zeros(place_point(&digits, scale as u32))
        } else {
            let mut s = digits.to_string();
            if !digits.is_zero() {
                s.push_str(&"0".repeat((-scale) as usize));
            }
            s
        };
        with_sign(self.is_negative() && rendered != "0", rendered)
    }

    /// Render with exactly `decimal_places` digits after the point.
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        let scaled = div_round(
            &(self.numerator.magnitude() * pow10(decimal_places)),
            self.denominator.magnitude(),
            rounding,
        );
        let negative = self.is_negative() && !scaled.is_zero();
        with_sign(negative, place_point(&scaled, decimal_places))
    }
}

/// Insert `separator` between groups of three digits of the integer part.
pub fn group_digits(value: &str, separator: char) -> String {
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn pow10(exponent: u32) -> BigUint {
    BigUint::from(10u32).pow(exponent)
}

fn decimal_len(value: &BigUint) -> usize {
    value.to_string().len()
}

/// Integer division of magnitudes with explicit rounding.
pub(crate) fn div_round(numerator: &BigUint, denominator: &BigUint, rounding: Rounding) -> BigUint {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.is_zero() {
        return quotient;
    }
    match rounding {
        Rounding::RoundDown => quotient,
        Rounding::RoundUp => quotient + 1u32,
        Rounding::RoundHalfUp => {
            if remainder * 2u32 >= *denominator {
                quotient + 1u32
            } else {
                quotient
            }
        }
    }
}

/// Render `digits * 10^-places` in plain decimal notation.
fn place_point(digits: &BigUint, places: u32) -> String {
    let raw = digits.to_string();
    if places == 0 {
        return raw;
    }
    let places = places as usize;
    let padded = if raw.len() <= places {
        format!("{}{}", "0".repeat(places + 1 - raw.len()), raw)
    } else {
        raw
    };
    let (integer, fraction) = padded.split_at(padded.len() - places);
    format!("{integer}.{fraction}")
}

fn trim_fraction_zeros(value: String) -> String {
    if !value.contains('.') {
        return value;
    }
    value.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn with_sign(negative: bool, value: String) -> String {
    if negative {
        format!("-{value}")
    } else {
        value
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<&BigInt> for Fraction {
    fn from(value: &BigInt) -> Self {
        Fraction::from_integer(value.clone())
    }
}

impl From<u64> for Fraction {
    fn from(value: u64) -> Self {
        Fraction::from_integer(value)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare a/b vs c/d by comparing a*d vs c*b; denominators are positive.
        let lhs = &self.numerator * &other.denominator;
        let rhs = &other.numerator * &self.denominator;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator.is_one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl<'a> Add<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn add(self, other: &'a Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction {
                numerator: &self.numerator + &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Fraction {
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl<'a> Sub<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn sub(self, other: &'a Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction {
                numerator: &self.numerator - &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Fraction {
            numerator: &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl<'a> Mul<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn mul(self, other: &'a Fraction) -> Fraction {
        Fraction {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl<'a> Div<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    /// Panics if `other` is zero; use [`Fraction::checked_div`] otherwise.
    fn div(self, other: &'a Fraction) -> Fraction {
        Fraction::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }
}

macro_rules! forward_owned_ops {
    ($($trait:ident :: $method:ident),*) => {$(
        impl $trait<Fraction> for Fraction {
            type Output = Fraction;

            fn $method(self, other: Fraction) -> Fraction {
                (&self).$method(&other)
            }
        }

        impl<'a> $trait<&'a Fraction> for Fraction {
            type Output = Fraction;

            fn $method(self, other: &'a Fraction) -> Fraction {
                (&self).$method(other)
            }
        }

        impl<'a> $trait<Fraction> for &'a Fraction {
            type Output = Fraction;

            fn $method(self, other: Fraction) -> Fraction {
                self.$method(&other)
            }
        }
    )*};
}

forward_owned_ops!(Add::add, Sub::sub, Mul::mul, Div::div);
