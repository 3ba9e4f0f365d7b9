//! Helpers that turn trades into the numbers a swap form shows.

use crate::amount::CurrencyAmount;
use crate::config::PriceImpactThresholds;
use crate::currency::Currency;
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::percent::Percent;
use crate::price::Price;
use crate::trade::Trade;
use crate::types::BIPS_BASE;

/// Relative shortfall of `output_amount` against what `mid_price` quotes.
///
/// The quote is an exact fraction and is not bounded by uint256, so a deep
/// pool priced against a tiny one still yields an impact.
pub fn compute_price_impact(
    mid_price: &Price,
    input_amount: &CurrencyAmount,
    output_amount: &CurrencyAmount,
) -> Result<Percent> {
    ensure_same(mid_price.base_currency(), input_amount.currency())?;
    ensure_same(mid_price.quote_currency(), output_amount.currency())?;

    let quoted = mid_price.raw() * input_amount.as_fraction();
    let difference = &quoted - output_amount.as_fraction();
    let impact = difference.checked_div(&quoted).ok_or(Error::DivisionByZero)?;
    Ok(Percent::from(impact))
}

fn ensure_same(expected: &Currency, found: &Currency) -> Result<()> {
    if expected != found {
        return Err(Error::CurrencyMismatch {
            left: expected.to_string(),
            right: found.to_string(),
        });
    }
    Ok(())
}

/// Worst acceptable amounts for a trade under the allowed slippage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlippageAdjustedAmounts {
    /// Most the user may spend.
    pub maximum_input: CurrencyAmount,
    /// Least the user may receive.
    pub minimum_output: CurrencyAmount,
}

pub fn compute_slippage_adjusted_amounts(
    trade: &Trade,
    allowed_slippage_bps: u32,
) -> Result<SlippageAdjustedAmounts> {
    let slippage = Percent::from_bips(allowed_slippage_bps);
    Ok(SlippageAdjustedAmounts {
        maximum_input: trade.maximum_amount_in(&slippage)?,
        minimum_output: trade.minimum_amount_out(&slippage)?,
    })
}

/// Price impact split into the part caused by LP fees and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Impact caused by the curve alone.
    pub price_impact_without_fee: Percent,
    /// Share of the input paid as LP fees over every hop.
    pub realized_lp_fee: Percent,
    /// The same fee as an amount of the input currency, rounded down.
    pub realized_lp_fee_amount: CurrencyAmount,
}

/// Separate a trade's price impact from the fees it pays.
///
/// Fees compound per hop: a route through fees `f1, f2` keeps
/// `(1−f1)(1−f2)` of the input, so the realized fee is one minus that.
pub fn compute_trade_price_breakdown(trade: &Trade) -> Result<PriceBreakdown> {
    let kept = trade
        .route()
        .pairs()
        .iter()
        .fold(Fraction::one(), |kept, pair| {
            let (numerator, denominator) = pair.input_fraction_after_fee();
            kept * Fraction::new(numerator, denominator)
        });
    let realized_lp_fee = Percent::from(&Fraction::one() - &kept);

    let price_impact_without_fee = trade.price_impact().subtract(&realized_lp_fee);
    let fee = realized_lp_fee.as_fraction() * &Fraction::from_integer(trade.input_amount().quotient());
    let realized_lp_fee_amount =
        CurrencyAmount::from_raw_amount(trade.input_amount().currency().clone(), fee.quotient())?;

    Ok(PriceBreakdown {
        price_impact_without_fee,
        realized_lp_fee,
        realized_lp_fee_amount,
    })
}

/// Grade a price impact from 0 (fine) to 4 (blocked for non-experts).
pub fn warning_severity(price_impact: &Percent, thresholds: &PriceImpactThresholds) -> u8 {
    let levels = [
        thresholds.blocked_non_expert_bps,
        thresholds.high_bps,
        thresholds.medium_bps,
        thresholds.low_bps,
    ];
    levels
        .iter()
        .position(|bps| !price_impact.less_than(&Percent::from_bips(*bps)))
        .map_or(0, |index| (levels.len() - index) as u8)
}

/// Whether the user has to confirm the swap explicitly.
pub fn requires_confirmation(price_impact_without_fee: &Percent, thresholds: &PriceImpactThresholds) -> bool {
    price_impact_without_fee.greater_than(&Percent::from_bips(thresholds.confirm_bps))
}

/// `[min, max]` raw bounds of `amount` under `slippage_bps`, both rounded down.
///
/// Used when adding or removing liquidity, where both sides move.
pub fn calculate_slippage_amount(amount: &CurrencyAmount, slippage_bps: u32) -> Result<[CurrencyAmount; 2]> {
    let slippage = u64::from(slippage_bps);
    if slippage > BIPS_BASE {
        return Err(Error::InvalidSlippage);
    }
    let raw = amount.quotient();
    let minimum = &raw * (BIPS_BASE - slippage) / BIPS_BASE;
    let maximum = &raw * (BIPS_BASE + slippage) / BIPS_BASE;
    Ok([
        CurrencyAmount::from_raw_amount(amount.currency().clone(), minimum)?,
        CurrencyAmount::from_raw_amount(amount.currency().clone(), maximum)?,
    ])
}

/// Whether `b` beats `a` by more than `minimum_delta`.
///
/// `None` when neither trade exists; a missing trade loses to any trade.
pub fn is_trade_better(a: Option<&Trade>, b: Option<&Trade>, minimum_delta: &Percent) -> Result<Option<bool>> {
    let (a, b) = match (a, b) {
        (Some(_), None) => return Ok(Some(false)),
        (None, Some(_)) => return Ok(Some(true)),
        (None, None) => return Ok(None),
        (Some(a), Some(b)) => (a, b),
    };

    if a.trade_type() != b.trade_type()
        || a.input_amount().currency() != b.input_amount().currency()
        || a.output_amount().currency() != b.output_amount().currency()
    {
        return Err(Error::IncomparableTrades);
    }

    let price_a = a.execution_price().raw();
    let price_b = b.execution_price().raw();
    if minimum_delta.is_zero() {
        return Ok(Some(price_a < price_b));
    }
    let threshold = price_a * &Percent::one_hundred().add(minimum_delta).into_fraction();
    Ok(Some(threshold < *price_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Deployment;
    use crate::currency::Token;
    use crate::pair::Pair;
    use crate::route::Route;
    use crate::types::{Address, BigInt};

    fn token(byte: u8) -> Token {
        Token::new(137, Address::repeat_byte(byte), 18, format!("T{byte}")).unwrap()
    }

    fn amount(token: &Token, raw: impl Into<BigInt>) -> CurrencyAmount {
        CurrencyAmount::from_raw_amount(token.clone(), raw).unwrap()
    }

    fn pair(a: &Token, ra: u64, b: &Token, rb: u64) -> Pair {
        Pair::new(amount(a, ra), amount(b, rb), &Deployment::default()).unwrap()
    }

    #[test]
    fn test_price_impact() {
        let (t0, t1) = (token(1), token(2));
        let mid = Price::new(t0.clone().into(), t1.clone().into(), 1, 2);
        let impact = compute_price_impact(&mid, &amount(&t0, 100), &amount(&t1, 190)).unwrap();
        assert_eq!(impact, Percent::new(10, 200));

        assert!(matches!(
            compute_price_impact(&mid, &amount(&t1, 100), &amount(&t1, 190)),
            Err(Error::CurrencyMismatch { .. })
        ));

        let zero = Price::new(t0.clone().into(), t1.clone().into(), 1, 0);
        assert!(matches!(
            compute_price_impact(&zero, &amount(&t0, 100), &amount(&t1, 0)),
            Err(Error::DivisionByZero)
        ));
    }

    #[test]
    fn test_price_impact_beyond_uint256() {
        let (t0, t1) = (token(1), token(2));
        // Quoting 2^200 at a price of 2^100 lands far above uint256.
        let mid = Price::new(t0.clone().into(), t1.clone().into(), 1, BigInt::from(1) << 100);
        let input = amount(&t0, BigInt::from(1) << 200);
        let impact = compute_price_impact(&mid, &input, &amount(&t1, 1000)).unwrap();

        assert!(impact.less_than(&Percent::one_hundred()));
        assert!(impact.greater_than(&Percent::new(99, 100)));
    }

    #[test]
    fn test_calculate_slippage_amount() {
        let t0 = token(1);
        let [minimum, maximum] = calculate_slippage_amount(&amount(&t0, 1000), 50).unwrap();
        assert_eq!(minimum.quotient(), BigInt::from(995));
        assert_eq!(maximum.quotient(), BigInt::from(1005));

        let [minimum, maximum] = calculate_slippage_amount(&amount(&t0, 1000), 0).unwrap();
        assert_eq!((minimum.quotient(), maximum.quotient()), (BigInt::from(1000), BigInt::from(1000)));

        assert!(matches!(
            calculate_slippage_amount(&amount(&t0, 1000), 10_001),
            Err(Error::InvalidSlippage)
        ));
    }

    #[test]
    fn test_slippage_adjusted_amounts() {
        let (t0, t1) = (token(1), token(2));
        let route = Route::new(vec![pair(&t0, 1_000_000, &t1, 1_000_000)], t0.clone(), None).unwrap();

        let trade = Trade::exact_in(route.clone(), amount(&t0, 1000)).unwrap();
        let adjusted = compute_slippage_adjusted_amounts(&trade, 50).unwrap();
        assert_eq!(adjusted.maximum_input, amount(&t0, 1000));
        let out = trade.output_amount().quotient();
        assert_eq!(adjusted.minimum_output.quotient(), out * 995 / 1000);

        let trade = Trade::exact_out(route, amount(&t1, 1000)).unwrap();
        let adjusted = compute_slippage_adjusted_amounts(&trade, 50).unwrap();
        assert_eq!(adjusted.minimum_output, amount(&t1, 1000));
        let input = trade.input_amount().quotient();
        assert_eq!(adjusted.maximum_input.quotient(), (input * 1005 + 999) / 1000);
    }

    #[test]
    fn test_price_breakdown_compounds_fees() {
        let (t0, t1, t2) = (token(1), token(2), token(3));
        let pairs = vec![pair(&t0, 1_000_000, &t1, 1_000_000), pair(&t1, 1_000_000, &t2, 1_000_000)];
        let route = Route::new(pairs, t0.clone(), None).unwrap();
        let trade = Trade::exact_in(route, amount(&t0, 10_000)).unwrap();

        let breakdown = compute_trade_price_breakdown(&trade).unwrap();
        // 1 - 0.9975^2
        assert_eq!(breakdown.realized_lp_fee, Percent::new(499_375, 100_000_000));
        assert_eq!(breakdown.realized_lp_fee_amount.quotient(), BigInt::from(49));
        assert_eq!(
            breakdown.price_impact_without_fee,
            trade.price_impact().subtract(&breakdown.realized_lp_fee)
        );
        assert!(breakdown.price_impact_without_fee.less_than(trade.price_impact()));
    }

    #[test]
    fn test_warning_severity() {
        let thresholds = PriceImpactThresholds::default();
        assert_eq!(warning_severity(&Percent::from_bips(50), &thresholds), 0);
        assert_eq!(warning_severity(&Percent::from_bips(100), &thresholds), 1);
        assert_eq!(warning_severity(&Percent::from_bips(300), &thresholds), 2);
        assert_eq!(warning_severity(&Percent::from_bips(499), &thresholds), 2);
        assert_eq!(warning_severity(&Percent::from_bips(500), &thresholds), 3);
        assert_eq!(warning_severity(&Percent::from_bips(2000), &thresholds), 4);

        assert!(!requires_confirmation(&Percent::from_bips(1000), &thresholds));
        assert!(requires_confirmation(&Percent::from_bips(1001), &thresholds));
    }

    #[test]
    fn test_is_trade_better() {
        let (t0, t1) = (token(1), token(2));
        let shallow = Route::new(vec![pair(&t0, 10_000, &t1, 10_000)], t0.clone(), None).unwrap();
        let deep = Route::new(vec![pair(&t0, 1_000_000, &t1, 1_000_000)], t0.clone(), None).unwrap();
        let worse = Trade::exact_in(shallow, amount(&t0, 1000)).unwrap();
        let better = Trade::exact_in(deep, amount(&t0, 1000)).unwrap();

        assert_eq!(is_trade_better(Some(&worse), Some(&better), &Percent::zero()).unwrap(), Some(true));
        assert_eq!(is_trade_better(Some(&better), Some(&worse), &Percent::zero()).unwrap(), Some(false));
        // Better by roughly 10%, not by 50%.
        assert_eq!(
            is_trade_better(Some(&worse), Some(&better), &Percent::from_bips(5000)).unwrap(),
            Some(false)
        );
        assert_eq!(is_trade_better(None, Some(&better), &Percent::zero()).unwrap(), Some(true));
        assert_eq!(is_trade_better(Some(&better), None, &Percent::zero()).unwrap(), Some(false));
        assert_eq!(is_trade_better(None, None, &Percent::zero()).unwrap(), None);
    }

    #[test]
    fn test_is_trade_better_rejects_mixed_trades() {
        let (t0, t1) = (token(1), token(2));
        let route = Route::new(vec![pair(&t0, 10_000, &t1, 10_000)], t0.clone(), None).unwrap();
        let exact_in = Trade::exact_in(route.clone(), amount(&t0, 100)).unwrap();
        let exact_out = Trade::exact_out(route, amount(&t1, 100)).unwrap();

        assert!(matches!(
            is_trade_better(Some(&exact_in), Some(&exact_out), &Percent::zero()),
            Err(Error::IncomparableTrades)
        ));
    }
}
