//! Exchange rates between two currencies.

use crate::amount::CurrencyAmount;
use crate::currency::Currency;
use crate::error::{Error, Result};
use crate::fraction::{Fraction, Rounding};
use crate::types::BigInt;
use std::fmt;

/// How much `quote` one unit of `base` buys.
///
/// The raw ratio is between smallest units (`quote raw / base raw`); the
/// decimal scalar converts it into a human-unit price for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    base: Currency,
    quote: Currency,
    raw: Fraction,
    scalar: Fraction,
}

impl Price {
    /// Create a price of `numerator` quote units per `denominator` base units.
    ///
    /// Panics if `denominator` is zero.
    pub fn new(
        base: Currency,
        quote: Currency,
        denominator: impl Into<BigInt>,
        numerator: impl Into<BigInt>,
    ) -> Self {
        let scalar = Fraction::new(
            BigInt::from(10u32).pow(u32::from(base.decimals())),
            BigInt::from(10u32).pow(u32::from(quote.decimals())),
        );
        Self {
            base,
            quote,
            raw: Fraction::new(numerator, denominator),
            scalar,
        }
    }

    /// The price implied by exchanging `base_amount` for `quote_amount`.
    pub fn from_amounts(base_amount: &CurrencyAmount, quote_amount: &CurrencyAmount) -> Result<Self> {
        let ratio = quote_amount
            .as_fraction()
            .checked_div(base_amount.as_fraction())
            .ok_or(Error::DivisionByZero)?;
        Ok(Self::new(
            base_amount.currency().clone(),
            quote_amount.currency().clone(),
            ratio.denominator().clone(),
            ratio.numerator().clone(),
        ))
    }

    /// Currency being priced.
    pub fn base_currency(&self) -> &Currency {
        &self.base
    }

    /// Currency the price is expressed in.
    pub fn quote_currency(&self) -> &Currency {
        &self.quote
    }

    /// Ratio between smallest units.
    pub fn raw(&self) -> &Fraction {
        &self.raw
    }

    /// Ratio between human units.
    pub fn adjusted_for_decimals(&self) -> Fraction {
        &self.raw * &self.scalar
    }

    /// Flip base and quote. Panics if the price is zero.
    pub fn invert(&self) -> Price {
        Price::new(
            self.quote.clone(),
            self.base.clone(),
            self.raw.numerator().clone(),
            self.raw.denominator().clone(),
        )
    }

    /// Chain two prices: `A/B * B/C = A/C`.
    pub fn multiply(&self, other: &Price) -> Result<Price> {
        if self.quote != other.base {
            return Err(Error::CurrencyMismatch {
                left: self.quote.to_string(),
                right: other.base.to_string(),
            });
        }
        let product = &self.raw * &other.raw;
        Ok(Price::new(
            self.base.clone(),
            other.quote.clone(),
            product.denominator().clone(),
            product.numerator().clone(),
        ))
    }

    /// Amount of quote currency worth `amount` of the base currency.
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount> {
        if *amount.currency() != self.base {
            return Err(Error::CurrencyMismatch {
                left: self.base.to_string(),
                right: amount.currency().to_string(),
            });
        }
        let result = &self.raw * amount.as_fraction();
        CurrencyAmount::from_fractional_amount(
            self.quote.clone(),
            result.numerator().clone(),
            result.denominator().clone(),
        )
    }

    /// Decimal-adjusted price with `significant_digits` significant digits.
    pub fn to_significant(&self, significant_digits: u32, rounding: Rounding) -> String {
        self.adjusted_for_decimals().to_significant(significant_digits, rounding)
    }

    /// Decimal-adjusted price with exactly `decimal_places` decimals.
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.adjusted_for_decimals().to_fixed(decimal_places, rounding)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} per {}",
            self.to_significant(6, Rounding::RoundHalfUp),
            self.quote,
            self.base
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Token;
    use crate::types::Address;

    fn token(byte: u8, decimals: u8) -> Currency {
        Token::new(1, Address::repeat_byte(byte), decimals, format!("T{byte}"))
            .unwrap()
            .into()
    }

    #[test]
    fn test_from_amounts() {
        let base = CurrencyAmount::from_raw_amount(token(1, 18), 1).unwrap();
        let quote = CurrencyAmount::from_raw_amount(token(2, 18), 54321).unwrap();
        let price = Price::from_amounts(&base, &quote).unwrap();

        assert_eq!(price.to_significant(5, Rounding::RoundDown), "54321");
        assert_eq!(price.base_currency(), &token(1, 18));
        assert_eq!(price.quote_currency(), &token(2, 18));
    }

    #[test]
    fn test_quote() {
        let price = Price::new(token(1, 18), token(2, 18), 1, 5);
        let amount = CurrencyAmount::from_raw_amount(token(1, 18), 10).unwrap();
        let quoted = price.quote(&amount).unwrap();

        assert_eq!(quoted.currency(), &token(2, 18));
        assert_eq!(quoted.quotient(), BigInt::from(50));

        let wrong = CurrencyAmount::from_raw_amount(token(2, 18), 10).unwrap();
        assert!(matches!(price.quote(&wrong), Err(Error::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_decimal_adjustment() {
        // 1 base (6 decimals) = 1e6 raw buys 3 quote (18 decimals) = 3e18 raw
        let price = Price::new(token(1, 6), token(2, 18), 1_000_000, 3_000_000_000_000_000_000u128);
        assert_eq!(price.to_significant(4, Rounding::RoundDown), "3");
        assert_eq!(price.to_fixed(2, Rounding::RoundDown), "3.00");
        assert_eq!(price.invert().to_significant(4, Rounding::RoundDown), "0.3333");
    }

    #[test]
    fn test_invert_swaps_currencies() {
        let price = Price::new(token(1, 18), token(2, 18), 4, 3);
        let inverted = price.invert();
        assert_eq!(inverted.base_currency(), &token(2, 18));
        assert_eq!(inverted.quote_currency(), &token(1, 18));
        assert_eq!(inverted.raw(), &Fraction::new(4, 3));
    }

    #[test]
    fn test_multiply() {
        let ab = Price::new(token(1, 18), token(2, 18), 1, 2);
        let bc = Price::new(token(2, 18), token(3, 18), 1, 3);
        let ac = ab.multiply(&bc).unwrap();

        assert_eq!(ac.base_currency(), &token(1, 18));
        assert_eq!(ac.quote_currency(), &token(3, 18));
        assert_eq!(ac.raw(), &Fraction::from_integer(6));
        assert!(matches!(bc.multiply(&ab), Err(Error::CurrencyMismatch { .. })));
    }
}
