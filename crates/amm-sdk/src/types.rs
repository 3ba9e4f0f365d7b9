//! Core type definitions for the SDK.
//!
//! Re-exports from alloy-primitives for Ethereum-compatible types, plus the
//! arbitrary-precision integer used for every amount and reserve.

pub use alloy::primitives::{keccak256, Address, Bytes, ChainId, B256, U256};
pub use num_bigint::{BigInt, Sign};

use serde::{Deserialize, Serialize};

/// Well-known chain identifiers.
pub mod chains {
    use super::ChainId;

    pub const ETHEREUM: ChainId = 1;
    pub const GOERLI: ChainId = 5;
    pub const SVC: ChainId = 36;
    pub const POLYGON: ChainId = 137;
    pub const MUMBAI: ChainId = 80001;
}

/// Liquidity permanently locked by the first mint of every pair.
pub const MINIMUM_LIQUIDITY: u64 = 1000;

/// Denominator of every basis-point quantity (1 bp = 0.01%).
pub const BIPS_BASE: u64 = 10_000;

/// Largest value an on-chain `uint256` can hold.
pub fn max_uint256() -> BigInt {
    u256_to_bigint(U256::MAX)
}

/// Losslessly widen a chain `uint256` into a [`BigInt`].
pub fn u256_to_bigint(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

/// Which side of a trade the user fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    /// The input amount is known, the output is computed.
    ExactInput,
    /// The output amount is known, the input is computed.
    ExactOutput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_uint256() {
        let max = max_uint256();
        assert_eq!(max + 1, BigInt::from(1) << 256);
    }

    #[test]
    fn test_u256_conversion() {
        assert_eq!(u256_to_bigint(U256::ZERO), BigInt::from(0));
        assert_eq!(
            u256_to_bigint(U256::from(1_000_000_000_000_000_000u128)),
            BigInt::from(1_000_000_000_000_000_000u128)
        );
    }
}
