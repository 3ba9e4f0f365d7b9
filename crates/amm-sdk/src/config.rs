//! SDK configuration parameters.
//!
//! [`DexConfig`] carries the user-tunable preferences the surrounding
//! application stores (slippage, deadline, routing limits). [`Deployment`]
//! carries the constants of one deployed factory (fee, init code hash).

use crate::trade::BestTradeOptions;
use crate::types::{Address, B256};
use alloy::primitives::{address, b256};
use serde::{Deserialize, Serialize};

/// Init code hash of the pair contract deployed by the SvcDex factories.
pub const INIT_CODE_HASH: B256 =
    b256!("d2ba33143657b9d9addaa60522ccfe49ca1b4b4c3d4560ac710a5fe266d069be");

/// Factory address on Polygon.
pub const POLYGON_FACTORY: Address = address!("055133cf912411bDcf5C797F42425fB8848A0e23");

/// Factory address on Mumbai.
pub const MUMBAI_FACTORY: Address = address!("E857086AF5889e9A59d7Bed75A3082548386a842");

/// Price-impact levels in basis points used to grade a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceImpactThresholds {
    /// Above this the impact is worth a notice (1%).
    pub low_bps: u32,
    /// Above this the impact is a warning (3%).
    pub medium_bps: u32,
    /// Above this the impact is severe (5%).
    pub high_bps: u32,
    /// Above this the user must confirm explicitly (10%).
    pub confirm_bps: u32,
    /// Above this non-expert users may not swap at all (15%).
    pub blocked_non_expert_bps: u32,
}

impl Default for PriceImpactThresholds {
    fn default() -> Self {
        Self {
            low_bps: 100,
            medium_bps: 300,
            high_bps: 500,
            confirm_bps: 1000,
            blocked_non_expert_bps: 1500,
        }
    }
}

/// Configuration for quoting and routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    /// Allowed slippage in basis points (1 bp = 0.01%).
    /// For example, 50 = 0.50%.
    pub allowed_slippage_bps: u32,

    /// Transaction deadline, in seconds from submission.
    pub deadline_secs: u64,

    /// Maximum number of hops allowed when routing through multiple pairs.
    pub max_hops: usize,

    /// Maximum number of ranked trades kept by the best-trade search.
    pub max_num_results: usize,

    /// Restrict routing to direct pairs.
    pub single_hop_only: bool,

    /// A trade with more hops must beat a shorter one by this many basis
    /// points before it is preferred.
    pub better_trade_threshold_bps: u32,

    /// Grading of price impact.
    pub price_impact: PriceImpactThresholds,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            allowed_slippage_bps: 50, // 0.50%
            deadline_secs: 60 * 20,   // 20 minutes
            max_hops: 3,              // Max 3 hops (4 tokens in path)
            max_num_results: 3,
            single_hop_only: false,
            better_trade_threshold_bps: 50,
            price_impact: PriceImpactThresholds::default(),
        }
    }
}

impl DexConfig {
    /// Create a new configuration with custom slippage tolerance.
    pub fn with_allowed_slippage_bps(mut self, bps: u32) -> Self {
        self.allowed_slippage_bps = bps;
        self
    }

    /// Create a new configuration with custom deadline.
    pub fn with_deadline_secs(mut self, secs: u64) -> Self {
        self.deadline_secs = secs;
        self
    }

    /// Create a new configuration with custom max routing hops.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Create a new configuration with custom result count.
    pub fn with_max_num_results(mut self, max_num_results: usize) -> Self {
        self.max_num_results = max_num_results;
        self
    }

    /// Create a new configuration restricted to direct pairs.
    pub fn with_single_hop_only(mut self, single_hop_only: bool) -> Self {
        self.single_hop_only = single_hop_only;
        self
    }

    /// Create a new configuration with a custom multi-hop threshold.
    pub fn with_better_trade_threshold_bps(mut self, bps: u32) -> Self {
        self.better_trade_threshold_bps = bps;
        self
    }

    /// Hop ceiling after applying `single_hop_only`.
    pub fn effective_max_hops(&self) -> usize {
        if self.single_hop_only {
            1
        } else {
            self.max_hops
        }
    }

    /// Search limits for the best-trade search.
    pub fn best_trade_options(&self) -> BestTradeOptions {
        BestTradeOptions::new(self.effective_max_hops(), self.max_num_results)
    }

    /// Absolute deadline for a transaction built at `now_secs`.
    pub fn deadline_from(&self, now_secs: u64) -> u64 {
        now_secs.saturating_add(self.deadline_secs)
    }
}

/// Constants of one deployed factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Factory that deploys pairs with CREATE2.
    pub factory: Address,
    /// keccak256 of the pair creation code.
    pub init_code_hash: B256,
    /// Swap fee taken from the input, in basis points.
    pub fee_bps: u32,
    /// Protocol share of the fee growth is `1 / divisor` of the LP growth.
    pub protocol_fee_divisor: u32,
    /// LP token metadata.
    pub lp_decimals: u8,
    pub lp_symbol: String,
    pub lp_name: String,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            factory: POLYGON_FACTORY,
            init_code_hash: INIT_CODE_HASH,
            fee_bps: 25, // 0.25%
            protocol_fee_divisor: 5,
            lp_decimals: 18,
            lp_symbol: "SVCD-LP".to_string(),
            lp_name: "SvcDex LPs".to_string(),
        }
    }
}

impl Deployment {
    /// Create a deployment for another factory, keeping default fees.
    pub fn new(factory: Address, init_code_hash: B256) -> Self {
        Self {
            factory,
            init_code_hash,
            ..Self::default()
        }
    }

    /// Create a new deployment with custom fee.
    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DexConfig::default();
        assert_eq!(config.allowed_slippage_bps, 50);
        assert_eq!(config.deadline_secs, 1200);
        assert_eq!(config.effective_max_hops(), 3);
        assert_eq!(config.deadline_from(1_000), 2_200);
    }

    #[test]
    fn test_single_hop_only() {
        let config = DexConfig::default().with_single_hop_only(true).with_max_hops(4);
        assert_eq!(config.effective_max_hops(), 1);
        assert_eq!(config.best_trade_options(), BestTradeOptions::new(1, 3));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DexConfig =
            serde_json::from_str(r#"{ "allowed_slippage_bps": 100, "max_hops": 2 }"#).unwrap();
        assert_eq!(config.allowed_slippage_bps, 100);
        assert_eq!(config.max_hops, 2);
        assert_eq!(config.deadline_secs, 1200);
        assert_eq!(config.price_impact, PriceImpactThresholds::default());
    }

    #[test]
    fn test_deployment_overrides() {
        let deployment = Deployment::new(MUMBAI_FACTORY, INIT_CODE_HASH).with_fee_bps(30);
        assert_eq!(deployment.factory, MUMBAI_FACTORY);
        assert_eq!(deployment.fee_bps, 30);
        assert_eq!(deployment.lp_symbol, "SVCD-LP");
    }
}
