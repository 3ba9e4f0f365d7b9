//! Per-chain native currencies, factory deployments and pair addresses.

use crate::amount::CurrencyAmount;
use crate::config::{Deployment, INIT_CODE_HASH, MUMBAI_FACTORY, POLYGON_FACTORY};
use crate::currency::{NativeCurrency, Token};
use crate::error::{Error, Result};
use crate::pair::{compute_pair_address, Pair};
use crate::types::{chains, Address, ChainId};
use alloy::primitives::address;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

type PairKey = (ChainId, Address, Address);

/// Explicitly initialized lookup tables for everything that varies by chain.
///
/// Natives are stored once per chain, so repeated lookups return the same
/// instance. Pair addresses are memoized per canonical token order.
#[derive(Debug, Default)]
pub struct ChainRegistry {
    natives: HashMap<ChainId, NativeCurrency>,
    deployments: HashMap<ChainId, Deployment>,
    pair_addresses: RwLock<HashMap<PairKey, Address>>,
}

impl ChainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the known chains and factories.
    pub fn with_defaults() -> Result<Self> {
        let weth = wrapped(chains::ETHEREUM, address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), "WETH", "Wrapped Ether");
        let goerli_weth = wrapped(chains::GOERLI, address!("B4FBF271143F4FBf7B91A5ded31805e42b2208d6"), "WETH", "Wrapped Ether");
        let wmatic = wrapped(chains::POLYGON, address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"), "WMATIC", "Wrapped MATIC");
        let mumbai_wmatic = wrapped(chains::MUMBAI, address!("9c3C9283D3e44854697Cd22D3Faa240Cfb032889"), "MATIC", "Wrapped MATIC");

        Ok(Self::new()
            .with_native(NativeCurrency::new(18, "ETH", "Ether", weth)?)
            .with_native(NativeCurrency::new(18, "GOR", "Goerli Ether", goerli_weth)?)
            .with_native(NativeCurrency::new(18, "MATIC", "Native Token", wmatic)?)
            .with_native(NativeCurrency::new(18, "MATIC", "Native Token", mumbai_wmatic)?)
            .with_deployment(chains::POLYGON, Deployment::new(POLYGON_FACTORY, INIT_CODE_HASH))
            .with_deployment(chains::MUMBAI, Deployment::new(MUMBAI_FACTORY, INIT_CODE_HASH)))
    }

    /// Register the native currency of its chain, replacing any previous one.
    pub fn with_native(mut self, native: NativeCurrency) -> Self {
        self.natives.insert(native.chain_id, native);
        self
    }

    /// Register the factory deployment of a chain.
    ///
    /// Replacing a deployment invalidates the pair addresses cached for that chain.
    pub fn with_deployment(mut self, chain_id: ChainId, deployment: Deployment) -> Self {
        self.deployments.insert(chain_id, deployment);
        self.pair_addresses
            .get_mut()
            .retain(|(chain, _, _), _| *chain != chain_id);
        self
    }

    /// The native currency of a chain.
    pub fn native_on_chain(&self, chain_id: ChainId) -> Result<&NativeCurrency> {
        self.natives.get(&chain_id).ok_or(Error::UnknownChain(chain_id))
    }

    /// The wrapped native token of a chain.
    pub fn wrapped_native(&self, chain_id: ChainId) -> Result<&Token> {
        self.native_on_chain(chain_id).map(NativeCurrency::wrapped)
    }

    /// Factory deployment of a chain.
    pub fn deployment(&self, chain_id: ChainId) -> Result<&Deployment> {
        self.deployments.get(&chain_id).ok_or(Error::UnknownChain(chain_id))
    }

    /// Chains with a registered native currency.
    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.natives.keys().copied()
    }

    /// Pair contract address of two tokens, computed once per token pair.
    pub fn pair_address(&self, token_a: &Token, token_b: &Token) -> Result<Address> {
        let (token0, token1) = if token_a.sorts_before(token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let key = (token0.chain_id, token0.address, token1.address);
        if let Some(address) = self.pair_addresses.read().get(&key) {
            return Ok(*address);
        }

        let deployment = self.deployment(token0.chain_id)?;
        let address = compute_pair_address(deployment, token0, token1)?;
        trace!("pair address: token0={:?}, token1={:?}, pair={:?}", token0.address, token1.address, address);
        self.pair_addresses.write().insert(key, address);
        Ok(address)
    }

    /// Build a pair on the chain of its tokens with that chain's deployment.
    pub fn pair(&self, amount_a: CurrencyAmount, amount_b: CurrencyAmount) -> Result<Pair> {
        let (amount_a, amount_b) = (amount_a.wrapped(), amount_b.wrapped());
        let token_a = amount_a.currency().wrapped();
        let token_b = amount_b.currency().wrapped();
        let address = self.pair_address(token_a, token_b)?;
        let deployment = self.deployment(token_a.chain_id)?;
        Pair::with_address(amount_a, amount_b, address, deployment)
    }

    /// Number of memoized pair addresses.
    pub fn cached_pair_addresses(&self) -> usize {
        self.pair_addresses.read().len()
    }
}

fn wrapped(chain_id: ChainId, address: Address, symbol: &str, name: &str) -> Token {
    Token {
        chain_id,
        address,
        decimals: 18,
        symbol: symbol.to_string(),
        name: Some(name.to_string()),
        logo_uri: None,
        project_link: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::types::BigInt;

    fn token(byte: u8) -> Token {
        Token::new(chains::POLYGON, Address::repeat_byte(byte), 18, format!("T{byte}")).unwrap()
    }

    #[test]
    fn test_defaults() {
        let registry = ChainRegistry::with_defaults().unwrap();

        let matic = registry.native_on_chain(chains::POLYGON).unwrap();
        assert_eq!(matic.symbol, "MATIC");
        assert_eq!(matic.wrapped().checksum_address(), "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270");
        assert_eq!(registry.native_on_chain(chains::ETHEREUM).unwrap().symbol, "ETH");
        assert_eq!(registry.deployment(chains::POLYGON).unwrap().factory, POLYGON_FACTORY);
        assert_eq!(registry.deployment(chains::MUMBAI).unwrap().factory, MUMBAI_FACTORY);
        assert_eq!(registry.chains().count(), 4);
    }

    #[test]
    fn test_unknown_chain() {
        let registry = ChainRegistry::with_defaults().unwrap();
        assert!(matches!(registry.native_on_chain(chains::SVC), Err(Error::UnknownChain(36))));
        assert!(matches!(registry.deployment(chains::ETHEREUM), Err(Error::UnknownChain(1))));

        let a = Token::new(chains::ETHEREUM, Address::repeat_byte(1), 18, "A").unwrap();
        let b = Token::new(chains::ETHEREUM, Address::repeat_byte(2), 18, "B").unwrap();
        assert!(matches!(registry.pair_address(&a, &b), Err(Error::UnknownChain(1))));
    }

    #[test]
    fn test_native_lookup_returns_same_instance() {
        let registry = ChainRegistry::with_defaults().unwrap();
        let first = registry.native_on_chain(chains::MUMBAI).unwrap();
        let second = registry.native_on_chain(chains::MUMBAI).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_pair_address_is_memoized_per_token_pair() {
        let registry = ChainRegistry::with_defaults().unwrap();
        let (a, b) = (token(1), token(2));

        let forward = registry.pair_address(&a, &b).unwrap();
        let backward = registry.pair_address(&b, &a).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(registry.cached_pair_addresses(), 1);
        assert_eq!(
            forward,
            compute_pair_address(&Deployment::default(), &a, &b).unwrap()
        );
    }

    #[test]
    fn test_replacing_deployment_clears_cache() {
        let (a, b) = (token(1), token(2));
        let registry = ChainRegistry::with_defaults().unwrap();
        let before = registry.pair_address(&a, &b).unwrap();

        let registry = registry.with_deployment(
            chains::POLYGON,
            Deployment::new(Address::repeat_byte(0xfa), INIT_CODE_HASH),
        );
        assert_eq!(registry.cached_pair_addresses(), 0);
        assert_ne!(registry.pair_address(&a, &b).unwrap(), before);
    }

    #[test]
    fn test_pair_wraps_native_amounts() {
        let registry = ChainRegistry::with_defaults().unwrap();
        let matic: Currency = registry.native_on_chain(chains::POLYGON).unwrap().clone().into();
        let other = token(0xee);

        let pair = registry
            .pair(
                CurrencyAmount::from_raw_amount(matic, 1000).unwrap(),
                CurrencyAmount::from_raw_amount(other.clone(), 2000).unwrap(),
            )
            .unwrap();
        let wmatic = registry.wrapped_native(chains::POLYGON).unwrap();
        assert!(pair.involves_token(wmatic));
        assert_eq!(pair.reserve_of(&other).unwrap().quotient(), BigInt::from(2000));
        assert_eq!(pair.address(), registry.pair_address(wmatic, &other).unwrap());
    }
}
