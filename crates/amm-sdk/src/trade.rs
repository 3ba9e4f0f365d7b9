//! Trades along a route and the search for the best ones.

use crate::amount::CurrencyAmount;
use crate::currency::{Currency, Token};
use crate::error::{Error, Result};
use crate::exchange::compute_price_impact;
use crate::fraction::{Fraction, Rounding};
use crate::pair::Pair;
use crate::percent::Percent;
use crate::price::Price;
use crate::route::Route;
use crate::types::TradeType;
use crate::utils::SortedBuffer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Limits for the best-trade search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestTradeOptions {
    /// Maximum number of pairs in a route.
    pub max_hops: usize,
    /// How many trades to return.
    pub max_num_results: usize,
}

impl Default for BestTradeOptions {
    fn default() -> Self {
        Self {
            max_hops: 3,
            max_num_results: 3,
        }
    }
}

impl BestTradeOptions {
    /// Search limits with an explicit hop and result count.
    pub fn new(max_hops: usize, max_num_results: usize) -> Self {
        Self {
            max_hops,
            max_num_results,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_hops == 0 {
            return Err(Error::InvalidOptions("max_hops must be positive"));
        }
        if self.max_num_results == 0 {
            return Err(Error::InvalidOptions("max_num_results must be positive"));
        }
        Ok(())
    }
}

/// A swap along a route with one side of the amount fixed.
///
/// Trades are immutable snapshots: a new user input or fresh reserves
/// produce a new trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    route: Route,
    trade_type: TradeType,
    /// Amount entering each token of the path, all in wrapped tokens.
    amounts: Vec<CurrencyAmount>,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    execution_price: Price,
    price_impact: Percent,
}

impl Trade {
    /// Trade spending exactly `amount_in` of the route input.
    pub fn exact_in(route: Route, amount_in: CurrencyAmount) -> Result<Self> {
        Self::new(route, amount_in, TradeType::ExactInput)
    }

    /// Trade receiving exactly `amount_out` of the route output.
    pub fn exact_out(route: Route, amount_out: CurrencyAmount) -> Result<Self> {
        Self::new(route, amount_out, TradeType::ExactOutput)
    }

    /// Walk the route from the fixed side, feeding each hop into the next.
    pub fn new(route: Route, amount: CurrencyAmount, trade_type: TradeType) -> Result<Self> {
        let hops = route.len();
        let mut amounts = Vec::with_capacity(hops + 1);

        let (input_amount, output_amount) = match trade_type {
            TradeType::ExactInput => {
                ensure_currency(amount.currency(), route.input())?;
                amounts.push(amount.wrapped());
                for (hop, pair) in route.pairs().iter().enumerate() {
                    let (output, _) = pair.get_output_amount(&amounts[hop])?;
                    amounts.push(output);
                }
                let output = in_currency(&amounts[hops], route.output())?;
                (amount, output)
            }
            TradeType::ExactOutput => {
                ensure_currency(amount.currency(), route.output())?;
                amounts.push(amount.wrapped());
                for pair in route.pairs().iter().rev() {
                    let (input, _) = pair.get_input_amount(&amounts[amounts.len() - 1])?;
                    amounts.push(input);
                }
                amounts.reverse();
                let input = in_currency(&amounts[0], route.input())?;
                (input, amount)
            }
        };

        let execution_price = Price::from_amounts(&input_amount, &output_amount)?;
        let price_impact = compute_price_impact(&route.mid_price()?, &input_amount, &output_amount)?;

        Ok(Self {
            route,
            trade_type,
            amounts,
            input_amount,
            output_amount,
            execution_price,
            price_impact,
        })
    }

    /// Route the trade follows.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Which side of the trade is fixed.
    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    /// Amount at every token of the path, input first, in wrapped tokens.
    pub fn amounts(&self) -> &[CurrencyAmount] {
        &self.amounts
    }

    /// Amount spent, in the route input currency.
    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    /// Amount received, in the route output currency.
    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    /// Output per input actually achieved.
    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    /// Shortfall of the output against the route mid price.
    pub fn price_impact(&self) -> &Percent {
        &self.price_impact
    }

    /// Least output accepted under `slippage`: `floor(out·(1−s))`.
    ///
    /// Exact-output trades return the fixed output.
    pub fn minimum_amount_out(&self, slippage: &Percent) -> Result<CurrencyAmount> {
        validate_slippage(slippage)?;
        if self.trade_type == TradeType::ExactOutput {
            return Ok(self.output_amount.clone());
        }
        let factor = &Fraction::one() - slippage.as_fraction();
        let minimum = (self.output_amount.as_fraction() * &factor).quotient_rounded(Rounding::RoundDown);
        CurrencyAmount::from_raw_amount(self.output_amount.currency().clone(), minimum)
    }

    /// Most input spent under `slippage`: `ceil(in·(1+s))`.
    ///
    /// Exact-input trades return the fixed input.
    pub fn maximum_amount_in(&self, slippage: &Percent) -> Result<CurrencyAmount> {
        validate_slippage(slippage)?;
        if self.trade_type == TradeType::ExactInput {
            return Ok(self.input_amount.clone());
        }
        let factor = &Fraction::one() + slippage.as_fraction();
        let maximum = (self.input_amount.as_fraction() * &factor).quotient_rounded(Rounding::RoundUp);
        CurrencyAmount::from_raw_amount(self.input_amount.currency().clone(), maximum)
    }

    /// Price the trade executes at if slippage goes fully against it.
    pub fn worst_execution_price(&self, slippage: &Percent) -> Result<Price> {
        Price::from_amounts(
            &self.maximum_amount_in(slippage)?,
            &self.minimum_amount_out(slippage)?,
        )
    }

    /// Up to `max_num_results` best trades spending `amount_in`, best first.
    ///
    /// Every route of at most `max_hops` pairs is explored, no pair appears
    /// twice in one route, and pairs that cannot serve a hop (empty reserves,
    /// dust amounts, amounts past uint256) are skipped rather than failing
    /// the search.
    pub fn best_trade_exact_in(
        pairs: &[Pair],
        amount_in: &CurrencyAmount,
        currency_out: &Currency,
        options: BestTradeOptions,
    ) -> Result<Vec<Trade>> {
        options.validate()?;
        debug!(
            "best_trade_exact_in: {} -> {}, {} pairs, max_hops={}",
            amount_in,
            currency_out,
            pairs.len(),
            options.max_hops
        );

        let mut search = Search {
            pairs,
            used: vec![false; pairs.len()],
            current: Vec::with_capacity(options.max_hops),
            best: SortedBuffer::new(options.max_num_results),
        };
        search.exact_in(amount_in, currency_out, &amount_in.wrapped(), options.max_hops)?;

        let trades = search.best.into_vec();
        debug!("best_trade_exact_in: found {} trades", trades.len());
        Ok(trades)
    }

    /// Up to `max_num_results` cheapest trades receiving `amount_out`, best first.
    pub fn best_trade_exact_out(
        pairs: &[Pair],
        currency_in: &Currency,
        amount_out: &CurrencyAmount,
        options: BestTradeOptions,
    ) -> Result<Vec<Trade>> {
        options.validate()?;
        debug!(
            "best_trade_exact_out: {} -> {}, {} pairs, max_hops={}",
            currency_in,
            amount_out,
            pairs.len(),
            options.max_hops
        );

        let mut search = Search {
            pairs,
            used: vec![false; pairs.len()],
            current: Vec::with_capacity(options.max_hops),
            best: SortedBuffer::new(options.max_num_results),
        };
        search.exact_out(currency_in, amount_out, &amount_out.wrapped(), options.max_hops)?;

        let trades = search.best.into_vec();
        debug!("best_trade_exact_out: found {} trades", trades.len());
        Ok(trades)
    }
}

/// Ranking used by the search: more output, then less input, then lower
/// price impact, then fewer hops. `Less` means better.
pub fn compare_trades(a: &Trade, b: &Trade) -> Ordering {
    b.output_amount
        .compare(&a.output_amount)
        .then_with(|| a.input_amount.compare(&b.input_amount))
        .then_with(|| a.price_impact.cmp(&b.price_impact))
        .then_with(|| a.route.len().cmp(&b.route.len()))
}

/// Depth-first state shared by both search directions.
struct Search<'a> {
    pairs: &'a [Pair],
    /// Pairs already on the current partial route.
    used: Vec<bool>,
    /// Current partial route; in output-to-input order for exact output.
    current: Vec<Pair>,
    best: SortedBuffer<Trade>,
}

impl Search<'_> {
    fn exact_in(
        &mut self,
        original: &CurrencyAmount,
        currency_out: &Currency,
        amount_in: &CurrencyAmount,
        hops_left: usize,
    ) -> Result<()> {
        let pairs = self.pairs;
        let token_out = currency_out.wrapped();

        for (index, pair) in pairs.iter().enumerate() {
            if self.used[index] || !pair.involves_token(hop_token(amount_in)) {
                continue;
            }
            let amount_out = match skip_unservable(pair.get_output_amount(amount_in))? {
                Some((amount_out, _)) => amount_out,
                None => continue,
            };

            if hop_token(&amount_out) == token_out {
                let route_pairs = self.current.iter().chain(std::iter::once(pair)).cloned().collect();
                let route = Route::new(route_pairs, original.currency().clone(), Some(currency_out.clone()))?;
                if let Some(trade) = skip_unservable(Trade::exact_in(route, original.clone()))? {
                    trace!("candidate {} -> {}", trade.route(), trade.output_amount());
                    self.best.insert_by(trade, compare_trades);
                }
            } else if hops_left > 1 {
                self.used[index] = true;
                self.current.push(pair.clone());
                self.exact_in(original, currency_out, &amount_out, hops_left - 1)?;
                self.current.pop();
                self.used[index] = false;
            }
        }
        Ok(())
    }

    fn exact_out(
        &mut self,
        currency_in: &Currency,
        original: &CurrencyAmount,
        amount_out: &CurrencyAmount,
        hops_left: usize,
    ) -> Result<()> {
        let pairs = self.pairs;
        let token_in = currency_in.wrapped();

        for (index, pair) in pairs.iter().enumerate() {
            if self.used[index] || !pair.involves_token(hop_token(amount_out)) {
                continue;
            }
            let amount_in = match skip_unservable(pair.get_input_amount(amount_out))? {
                Some((amount_in, _)) => amount_in,
                None => continue,
            };

            if hop_token(&amount_in) == token_in {
                let route_pairs = std::iter::once(pair).chain(self.current.iter().rev()).cloned().collect();
                let route = Route::new(route_pairs, currency_in.clone(), Some(original.currency().clone()))?;
                if let Some(trade) = skip_unservable(Trade::exact_out(route, original.clone()))? {
                    trace!("candidate {} <- {}", trade.route(), trade.input_amount());
                    self.best.insert_by(trade, compare_trades);
                }
            } else if hops_left > 1 {
                self.used[index] = true;
                self.current.push(pair.clone());
                self.exact_out(currency_in, original, &amount_in, hops_left - 1)?;
                self.current.pop();
                self.used[index] = false;
            }
        }
        Ok(())
    }
}

/// The result, or `None` when the pools cannot serve this hop or candidate.
fn skip_unservable<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(
            Error::InsufficientReserves
            | Error::InsufficientInputAmount
            | Error::AmountOverflow
            | Error::DivisionByZero,
        ) => Ok(None),
        Err(err) => Err(err),
    }
}

fn hop_token(amount: &CurrencyAmount) -> &Token {
    amount.currency().wrapped()
}

fn ensure_currency(found: &Currency, expected: &Currency) -> Result<()> {
    if found != expected {
        return Err(Error::CurrencyMismatch {
            left: expected.to_string(),
            right: found.to_string(),
        });
    }
    Ok(())
}

/// Re-express a wrapped hop amount in the route's own currency.
fn in_currency(amount: &CurrencyAmount, currency: &Currency) -> Result<CurrencyAmount> {
    let fraction = amount.as_fraction();
    CurrencyAmount::from_fractional_amount(
        currency.clone(),
        fraction.numerator().clone(),
        fraction.denominator().clone(),
    )
}

fn validate_slippage(slippage: &Percent) -> Result<()> {
    if slippage.is_negative() || slippage.greater_than(&Percent::one_hundred()) {
        return Err(Error::InvalidSlippage);
    }
    Ok(())
}
