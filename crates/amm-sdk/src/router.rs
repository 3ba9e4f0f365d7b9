//! Pair graph and trade selection for a snapshot of pools.

use crate::amount::CurrencyAmount;
use crate::config::DexConfig;
use crate::currency::{Currency, Token};
use crate::error::Result;
use crate::exchange::{
    compute_slippage_adjusted_amounts, compute_trade_price_breakdown, is_trade_better, warning_severity,
    SlippageAdjustedAmounts,
};
use crate::pair::Pair;
use crate::percent::Percent;
use crate::trade::{BestTradeOptions, Trade};
use crate::types::Address;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Router over one snapshot of pairs.
///
/// Adding a pair with a known address replaces the stale snapshot of it, so
/// a refresh is a sequence of `add_pair` calls with new reserves.
#[derive(Debug, Default)]
pub struct Router {
    /// Maps each token to the tokens it trades with directly.
    graph: HashMap<Token, HashSet<Token>>,
    /// Pairs in insertion order.
    pairs: Vec<Pair>,
    config: DexConfig,
}

impl Router {
    /// Create a new router.
    pub fn new(config: DexConfig) -> Self {
        Self {
            graph: HashMap::new(),
            pairs: Vec::new(),
            config,
        }
    }

    /// Create a router from pairs.
    pub fn with_pairs(config: DexConfig, pairs: impl IntoIterator<Item = Pair>) -> Self {
        let mut router = Self::new(config);
        for pair in pairs {
            router.add_pair(pair);
        }
        router
    }

    /// Get the router configuration.
    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    /// Get all pairs in the current snapshot.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Add a trading pair, replacing an earlier snapshot of the same pool.
    pub fn add_pair(&mut self, pair: Pair) {
        // Add bidirectional edges
        let (token0, token1) = (pair.token0().clone(), pair.token1().clone());
        self.graph
            .entry(token0.clone())
            .or_default()
            .insert(token1.clone());
        self.graph.entry(token1).or_default().insert(token0);

        match self.pairs.iter_mut().find(|existing| existing.address() == pair.address()) {
            Some(existing) => *existing = pair,
            None => self.pairs.push(pair),
        }
    }

    /// Remove a pair by its contract address.
    pub fn remove_pair(&mut self, address: Address) -> Option<Pair> {
        let index = self.pairs.iter().position(|pair| pair.address() == address)?;
        let pair = self.pairs.remove(index);
        if let Some(neighbors) = self.graph.get_mut(pair.token0()) {
            neighbors.remove(pair.token1());
        }
        if let Some(neighbors) = self.graph.get_mut(pair.token1()) {
            neighbors.remove(pair.token0());
        }
        Some(pair)
    }

    /// Get all tokens that are tradeable.
    pub fn all_tokens(&self) -> Vec<Token> {
        self.graph
            .iter()
            .filter(|(_, neighbors)| !neighbors.is_empty())
            .map(|(token, _)| token.clone())
            .collect()
    }

    /// Get all tokens that can be reached from a given token.
    pub fn reachable_tokens(&self, from: &Token) -> HashSet<Token> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(neighbors) = self.graph.get(current) {
                queue.extend(neighbors.iter().filter(|neighbor| !visited.contains(*neighbor)));
            }
        }

        visited.remove(from);
        visited
    }

    /// Check if there's any path between two currencies.
    pub fn has_path(&self, from: &Currency, to: &Currency) -> bool {
        let (from, to) = (from.wrapped(), to.wrapped());
        from == to || self.reachable_tokens(from).contains(to)
    }

    /// Ranked exact-input trades within the configured limits.
    pub fn best_trades_exact_in(&self, amount_in: &CurrencyAmount, currency_out: &Currency) -> Result<Vec<Trade>> {
        Trade::best_trade_exact_in(&self.pairs, amount_in, currency_out, self.config.best_trade_options())
    }

    /// Ranked exact-output trades within the configured limits.
    pub fn best_trades_exact_out(&self, currency_in: &Currency, amount_out: &CurrencyAmount) -> Result<Vec<Trade>> {
        Trade::best_trade_exact_out(&self.pairs, currency_in, amount_out, self.config.best_trade_options())
    }

    /// The trade to show for `amount_in`.
    ///
    /// Longer routes replace shorter ones only when they beat them by the
    /// configured threshold, since every extra hop costs gas.
    pub fn trade_exact_in(&self, amount_in: &CurrencyAmount, currency_out: &Currency) -> Result<Option<Trade>> {
        self.select_by_hops(|max_hops| {
            let options = BestTradeOptions::new(max_hops, 1);
            Trade::best_trade_exact_in(&self.pairs, amount_in, currency_out, options)
        })
    }

    /// The trade to show for `amount_out`.
    pub fn trade_exact_out(&self, currency_in: &Currency, amount_out: &CurrencyAmount) -> Result<Option<Trade>> {
        self.select_by_hops(|max_hops| {
            let options = BestTradeOptions::new(max_hops, 1);
            Trade::best_trade_exact_out(&self.pairs, currency_in, amount_out, options)
        })
    }

    fn select_by_hops<F>(&self, mut search: F) -> Result<Option<Trade>>
    where
        F: FnMut(usize) -> Result<Vec<Trade>>,
    {
        if self.config.single_hop_only {
            return Ok(search(1)?.into_iter().next());
        }

        let threshold = Percent::from_bips(self.config.better_trade_threshold_bps);
        let mut best: Option<Trade> = None;
        for max_hops in 1..=self.config.max_hops {
            let current = search(max_hops)?.into_iter().next();
            if is_trade_better(best.as_ref(), current.as_ref(), &threshold)? == Some(true) {
                debug!("max_hops={}: switching to {:?}", max_hops, current.as_ref().map(|t| t.route().to_string()));
                best = current;
            }
        }
        Ok(best)
    }

    /// Slippage bounds for `trade` at the configured tolerance.
    pub fn slippage_adjusted_amounts(&self, trade: &Trade) -> Result<SlippageAdjustedAmounts> {
        compute_slippage_adjusted_amounts(trade, self.config.allowed_slippage_bps)
    }

    /// Severity grade (0 to 4) of a trade's price impact, fees excluded.
    pub fn price_warning(&self, trade: &Trade) -> Result<u8> {
        let breakdown = compute_trade_price_breakdown(trade)?;
        Ok(warning_severity(
            &breakdown.price_impact_without_fee,
            &self.config.price_impact,
        ))
    }
}
