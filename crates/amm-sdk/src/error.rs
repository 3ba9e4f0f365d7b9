//! Error type shared by every module of the SDK.

use crate::types::{Address, ChainId};

/// Errors that can occur while building or evaluating amounts, pairs and trades.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Arithmetic between amounts of two different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },
    /// The integer part of an amount does not fit in a uint256.
    #[error("amount exceeds the uint256 maximum")]
    AmountOverflow,
    /// Malformed or badly checksummed address.
    #[error("`{0}` is not a valid address")]
    InvalidAddress(String),
    /// Decimals outside the supported range.
    #[error("invalid decimals: {0}")]
    InvalidDecimals(u8),
    /// No native currency or deployment is configured for the chain.
    #[error("no configuration for chain {0}")]
    UnknownChain(ChainId),
    /// Two values that must live on the same chain do not.
    #[error("chain mismatch: expected {expected}, found {found}")]
    ChainMismatch { expected: ChainId, found: ChainId },
    /// Both sides of a pair are the same token.
    #[error("identical token addresses {0}")]
    IdenticalAddresses(Address),
    /// The token is neither side of the pair.
    #[error("token {0} is not part of the pair")]
    TokenNotInPair(Address),
    /// A reserve is zero or too small for the requested output.
    #[error("insufficient reserves")]
    InsufficientReserves,
    /// The input is too small to produce any output.
    #[error("insufficient input amount")]
    InsufficientInputAmount,
    /// A route needs at least one pair.
    #[error("route has no pairs")]
    EmptyRoute,
    /// Consecutive pairs of a route do not share a token.
    #[error("route is disconnected at hop {0}")]
    DisconnectedRoute(usize),
    /// The route does not start at the requested input currency.
    #[error("route input is not part of the first pair")]
    InvalidRouteInput,
    /// The route does not end at the requested output currency.
    #[error("route output is not part of the last pair")]
    InvalidRouteOutput,
    /// Burning more LP tokens than exist.
    #[error("liquidity exceeds total supply")]
    LiquidityExceedsSupply,
    /// More decimal places requested than the currency has.
    #[error("{requested} decimal places exceed the {decimals} of the currency")]
    DecimalPlaces { requested: u32, decimals: u8 },
    /// Bad search parameters.
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    /// A division whose divisor evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Slippage tolerance outside [0, 100%].
    #[error("slippage tolerance must be between 0 and 100%")]
    InvalidSlippage,
    /// Trades of different types or currencies.
    #[error("trades are not comparable")]
    IncomparableTrades,
    /// The reserve reader failed.
    #[error("reserve read failed: {0}")]
    ReserveRead(String),
}

/// Result alias used throughout the SDK.
pub type Result<T, E = Error> = std::result::Result<T, E>;
