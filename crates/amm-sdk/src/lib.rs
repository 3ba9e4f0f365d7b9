//! Exact-arithmetic SDK for constant-product AMM pools.
//!
//! This library provides everything a swap front end needs before signing:
//! - Rational amounts, prices and percentages with explicit rounding
//! - Tokens, native currencies and CREATE2 pair addresses per chain
//! - Swap quotes with the pool fee, liquidity mint and burn math
//! - Multi-hop routes, trades and best-trade search with slippage bounds
//! - A router that prefers fewer hops unless a longer route pays off

pub mod amount;
pub mod config;
pub mod currency;
pub mod error;
pub mod exchange;
pub mod fraction;
pub mod pair;
pub mod percent;
pub mod price;
pub mod registry;
pub mod reserves;
pub mod route;
pub mod router;
pub mod trade;
pub mod types;
pub mod utils;

pub use amount::CurrencyAmount;
pub use config::{DexConfig, Deployment, PriceImpactThresholds};
pub use currency::{validate_and_parse_address, Currency, NativeCurrency, Token};
pub use error::{Error, Result};
pub use exchange::{
    calculate_slippage_amount, compute_price_impact, compute_slippage_adjusted_amounts,
    compute_trade_price_breakdown, is_trade_better, requires_confirmation, warning_severity,
    PriceBreakdown, SlippageAdjustedAmounts,
};
pub use fraction::{Fraction, Rounding};
pub use pair::{compute_pair_address, Pair};
pub use percent::Percent;
pub use price::Price;
pub use registry::ChainRegistry;
pub use reserves::{balance_of, load_pairs, CallTransport, ContractReader, ReserveReader, StaticReserves, TokenList};
pub use route::Route;
pub use router::Router;
pub use trade::{BestTradeOptions, Trade};
pub use types::{chains, Address, BigInt, ChainId, TradeType, B256, BIPS_BASE, U256};
