//! Amounts of a specific currency.

use crate::currency::{Currency, Token};
use crate::error::{Error, Result};
use crate::fraction::{Fraction, Rounding};
use crate::types::{max_uint256, BigInt};
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

/// A [`Fraction`] of the smallest unit of a currency.
///
/// Raw amounts have denominator one. Fractional amounts exist for
/// intermediate results and are floored with [`CurrencyAmount::quotient`]
/// before they are settled.
#[derive(Debug, Clone)]
pub struct CurrencyAmount {
    currency: Currency,
    fraction: Fraction,
    decimal_scale: BigInt,
}

impl CurrencyAmount {
    /// Wrap an integer amount of the smallest unit (wei, satoshi, ...).
    pub fn from_raw_amount(currency: impl Into<Currency>, raw_amount: impl Into<BigInt>) -> Result<Self> {
        Self::build(currency.into(), Fraction::from_integer(raw_amount))
    }

    /// Build an amount whose value is not yet an integer.
    ///
    /// Fails with [`Error::DivisionByZero`] on a zero denominator.
    pub fn from_fractional_amount(
        currency: impl Into<Currency>,
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Self::build(currency.into(), Fraction::new(numerator, denominator))
    }

    fn build(currency: Currency, fraction: Fraction) -> Result<Self> {
        if fraction.quotient() > max_uint256() {
            return Err(Error::AmountOverflow);
        }
        let decimal_scale = BigInt::from(10u32).pow(u32::from(currency.decimals()));
        Ok(Self {
            currency,
            fraction,
            decimal_scale,
        })
    }

    /// Currency of the amount.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Exact value in the smallest unit.
    pub fn as_fraction(&self) -> &Fraction {
        &self.fraction
    }

    /// `10^decimals` of the currency.
    pub fn decimal_scale(&self) -> &BigInt {
        &self.decimal_scale
    }

    /// Raw integer amount, rounded down.
    pub fn quotient(&self) -> BigInt {
        self.fraction.quotient()
    }

    pub fn is_zero(&self) -> bool {
        self.fraction.is_zero()
    }

    /// Sum of two amounts of the same currency.
    pub fn add(&self, other: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.ensure_same_currency(other)?;
        Self::build(self.currency.clone(), &self.fraction + &other.fraction)
    }

    /// Difference of two amounts of the same currency.
    pub fn subtract(&self, other: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.ensure_same_currency(other)?;
        Self::build(self.currency.clone(), &self.fraction - &other.fraction)
    }

    pub fn multiply(&self, other: &Fraction) -> Result<CurrencyAmount> {
        Self::build(self.currency.clone(), &self.fraction * other)
    }

    pub fn divide(&self, other: &Fraction) -> Result<CurrencyAmount> {
        let divided = self.fraction.checked_div(other).ok_or(Error::DivisionByZero)?;
        Self::build(self.currency.clone(), divided)
    }

    /// Human units with `significant_digits` significant digits.
    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> String {
        self.human_units().to_significant(significant_digits, rounding)
    }

    /// Human units with exactly `decimal_places` decimals.
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> Result<String> {
        let decimals = self.currency.decimals();
        if decimal_places > u32::from(decimals) {
            return Err(Error::DecimalPlaces {
                requested: decimal_places,
                decimals,
            });
        }
        Ok(self.human_units().to_fixed(decimal_places, rounding))
    }

    /// Human units at full precision, trailing zeros trimmed.
    pub fn to_exact(&self) -> String {
        let exact = Fraction::new(self.quotient(), self.decimal_scale.clone())
            .to_fixed(u32::from(self.currency.decimals()), Rounding::RoundDown);
        if exact.contains('.') {
            exact.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            exact
        }
    }

    /// The same value expressed in the wrapped token.
    pub fn wrapped(&self) -> CurrencyAmount {
        match &self.currency {
            Currency::Token(_) => self.clone(),
            Currency::Native(native) => Self {
                currency: Currency::Token(native.wrapped().clone()),
                fraction: self.fraction.clone(),
                decimal_scale: self.decimal_scale.clone(),
            },
        }
    }

    /// The token of this amount, when it is not a native amount.
    pub fn token(&self) -> Option<&Token> {
        self.currency.as_token()
    }

    pub fn less_than(&self, other: &CurrencyAmount) -> bool {
        self.fraction.less_than(&other.fraction)
    }

    pub fn equal_to(&self, other: &CurrencyAmount) -> bool {
        self.fraction.equal_to(&other.fraction)
    }

    pub fn greater_than(&self, other: &CurrencyAmount) -> bool {
        self.fraction.greater_than(&other.fraction)
    }

    /// Value comparison, ignoring the currency.
    pub fn compare(&self, other: &CurrencyAmount) -> Ordering {
        self.fraction.cmp(&other.fraction)
    }

    pub fn is_negative(&self) -> bool {
        self.fraction.numerator().is_negative()
    }

    fn human_units(&self) -> Fraction {
        &self.fraction / &Fraction::from_integer(self.decimal_scale.clone())
    }

    fn ensure_same_currency(&self, other: &CurrencyAmount) -> Result<()> {
        if self.currency != other.currency {
            return Err(Error::CurrencyMismatch {
                left: describe(&self.currency),
                right: describe(&other.currency),
            });
        }
        Ok(())
    }
}

fn describe(currency: &Currency) -> String {
    match currency {
        Currency::Native(native) => format!("{} (native, chain {})", native.symbol, native.chain_id),
        Currency::Token(token) => format!(
            "{} ({}, chain {})",
            token.symbol,
            token.checksum_address(),
            token.chain_id
        ),
    }
}

impl PartialEq for CurrencyAmount {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.fraction == other.fraction
    }
}

impl Eq for CurrencyAmount {}

impl PartialOrd for CurrencyAmount {
    /// Amounts of different currencies are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.fraction.cmp(&other.fraction))
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.currency.symbol())
    }
}
