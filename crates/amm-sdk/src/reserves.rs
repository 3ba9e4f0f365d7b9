//! Reading pool reserves and balances from a chain, and the token universe.
//!
//! The SDK itself never performs I/O. A [`ReserveReader`] hands it immutable
//! snapshots; [`ContractReader`] adapts any `eth_call` transport into one.

use crate::amount::CurrencyAmount;
use crate::currency::{Currency, Token};
use crate::error::{Error, Result};
use crate::pair::Pair;
use crate::registry::ChainRegistry;
use crate::types::{chains, u256_to_bigint, Address, Bytes, ChainId, U256};
use alloy_primitives::address;
use alloy_sol_macro::sol;
use alloy_sol_types::SolCall;
use std::collections::{HashMap, HashSet};
use tracing::debug;

sol! {
    interface IPair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Read-only access to on-chain state.
pub trait ReserveReader {
    /// Reserves of a pair contract in token0/token1 order, or `None` if the
    /// pair has not been deployed.
    fn get_reserves(&self, pair: Address) -> Result<Option<(U256, U256)>>;

    /// Balance of `account` in `token`, or in the native currency for `None`.
    fn get_balance(&self, account: Address, token: Option<Address>) -> Result<U256>;
}

/// In-memory snapshot of reserves and balances.
#[derive(Debug, Clone, Default)]
pub struct StaticReserves {
    reserves: HashMap<Address, (U256, U256)>,
    balances: HashMap<(Address, Option<Address>), U256>,
}

impl StaticReserves {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reserves of a pair contract.
    pub fn with_reserves(mut self, pair: Address, reserve0: U256, reserve1: U256) -> Self {
        self.reserves.insert(pair, (reserve0, reserve1));
        self
    }

    /// Record a balance; `None` is the native currency.
    pub fn with_balance(mut self, account: Address, token: Option<Address>, balance: U256) -> Self {
        self.balances.insert((account, token), balance);
        self
    }
}

impl ReserveReader for StaticReserves {
    fn get_reserves(&self, pair: Address) -> Result<Option<(U256, U256)>> {
        Ok(self.reserves.get(&pair).copied())
    }

    fn get_balance(&self, account: Address, token: Option<Address>) -> Result<U256> {
        Ok(self.balances.get(&(account, token)).copied().unwrap_or_default())
    }
}

/// Minimal `eth_call` client.
pub trait CallTransport {
    /// Call `to` with `data`; `None` when there is no contract at `to`.
    fn call(&self, to: Address, data: Bytes) -> Result<Option<Bytes>>;

    /// Native balance of an account.
    fn native_balance(&self, account: Address) -> Result<U256>;
}

/// A [`ReserveReader`] that ABI-encodes contract calls over a transport.
#[derive(Debug, Clone)]
pub struct ContractReader<T> {
    transport: T,
}

impl<T: CallTransport> ContractReader<T> {
    /// Reader issuing calls through `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: CallTransport> ReserveReader for ContractReader<T> {
    fn get_reserves(&self, pair: Address) -> Result<Option<(U256, U256)>> {
        let data = IPair::getReservesCall {}.abi_encode();
        let Some(output) = self.transport.call(pair, data.into())? else {
            return Ok(None);
        };
        if output.is_empty() {
            return Ok(None);
        }
        let reserves = IPair::getReservesCall::abi_decode_returns(&output)
            .map_err(|e| Error::ReserveRead(format!("failed to decode getReserves: {}", e)))?;
        Ok(Some((U256::from(reserves.reserve0), U256::from(reserves.reserve1))))
    }

    fn get_balance(&self, account: Address, token: Option<Address>) -> Result<U256> {
        let Some(token) = token else {
            return self.transport.native_balance(account);
        };
        let data = IERC20::balanceOfCall { account }.abi_encode();
        let output = self
            .transport
            .call(token, data.into())?
            .ok_or_else(|| Error::ReserveRead(format!("no contract at {}", token)))?;
        IERC20::balanceOfCall::abi_decode_returns(&output)
            .map_err(|e| Error::ReserveRead(format!("failed to decode balanceOf: {}", e)))
    }
}

/// Known tokens per chain and the bases routes are allowed to pass through.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: HashMap<ChainId, Vec<Token>>,
    bases: HashMap<ChainId, Vec<Token>>,
}

impl TokenList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pinned tokens of the Polygon and Mumbai deployments, all used as bases.
    pub fn with_defaults() -> Self {
        let polygon = [
            (address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"), 18, "WMATIC", "Wrapped MATIC"),
            (address!("9aA68BA3746D05009135D5f33D3Ced069dcA719b"), 18, "SVC", "Seven Chain Token"),
            (address!("c2132D05D31c914a87C6611C10748AEb04B58e8F"), 6, "USDT", "(PoS) Tether USD"),
            (address!("1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6"), 18, "WBTC", "Wrapped BTC"),
            (address!("7ceB23fD6bC0adD59E62ac25578270cFf1b9f619"), 18, "WETH", "Wrapped Ether"),
            (address!("bec158cd8dF7E48322485816Eab3a984f69458d8"), 18, "B2Z", "B2Z Exchange"),
            (address!("1073e91676A364b09a2FEC9a32Ec863e83776DF4"), 18, "JTT", "JTT TOKEN"),
        ];
        let mumbai = [
            (address!("9c3C9283D3e44854697Cd22D3Faa240Cfb032889"), 18, "MATIC", "Wrapped MATIC"),
            (address!("6beE03fD851D3d4370D1aE5C7171B26d8Ef93cC3"), 18, "SVC", "Seven Chain Token"),
            (address!("d3FCc4593470257Ab924950B5d83aeE611708533"), 18, "WBTC", "Wrapped BTC"),
            (address!("46D7484dd2E05F4108192Fd0c6431c8e24511C23"), 18, "WETH", "Wrapped Ether"),
            (address!("cD1D41332A35e8eE43FB7FC262ceC6E7C66C939d"), 18, "JTT", "JTT TOKEN"),
        ];

        let mut list = Self::new();
        for (chain_id, pinned) in [(chains::POLYGON, &polygon[..]), (chains::MUMBAI, &mumbai[..])] {
            let tokens: Vec<Token> = pinned
                .iter()
                .map(|(address, decimals, symbol, name)| Token {
                    chain_id,
                    address: *address,
                    decimals: *decimals,
                    symbol: symbol.to_string(),
                    name: Some(name.to_string()),
                    logo_uri: None,
                    project_link: None,
                })
                .collect();
            list = list.with_bases(chain_id, tokens.clone());
            for token in tokens {
                list = list.with_token(token);
            }
        }
        list
    }

    /// Add a token; a token already listed is replaced.
    pub fn with_token(mut self, token: Token) -> Self {
        let tokens = self.tokens.entry(token.chain_id).or_default();
        match tokens.iter_mut().find(|existing| **existing == token) {
            Some(existing) => *existing = token,
            None => tokens.push(token),
        }
        self
    }

    /// Set the routing bases of a chain.
    pub fn with_bases(mut self, chain_id: ChainId, bases: Vec<Token>) -> Self {
        self.bases.insert(chain_id, bases);
        self
    }

    /// Every listed token of a chain.
    pub fn tokens(&self, chain_id: ChainId) -> &[Token] {
        self.tokens.get(&chain_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Routing bases of a chain.
    pub fn bases(&self, chain_id: ChainId) -> &[Token] {
        self.bases.get(&chain_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Look up a listed token by address.
    pub fn token(&self, chain_id: ChainId, address: Address) -> Option<&Token> {
        self.tokens(chain_id).iter().find(|token| token.address == address)
    }

    /// Token pairs worth loading to route between `a` and `b`.
    ///
    /// The direct pair, each side against every base, and every base against
    /// every other base. Self pairs and duplicates are dropped.
    pub fn candidate_token_pairs(&self, a: &Currency, b: &Currency) -> Vec<(Token, Token)> {
        let (token_a, token_b) = (a.wrapped(), b.wrapped());
        if token_a.chain_id != token_b.chain_id {
            return Vec::new();
        }
        let bases = self.bases(token_a.chain_id);

        let direct = std::iter::once((token_a, token_b));
        let with_a = bases.iter().map(|base| (token_a, base));
        let with_b = bases.iter().map(|base| (token_b, base));
        let base_pairs = bases
            .iter()
            .flat_map(|base| bases.iter().map(move |other| (base, other)));

        let mut seen = HashSet::new();
        direct
            .chain(with_a)
            .chain(with_b)
            .chain(base_pairs)
            .filter(|(x, y)| x.address != y.address)
            .filter(|(x, y)| {
                let key = if x.address < y.address {
                    (x.address, y.address)
                } else {
                    (y.address, x.address)
                };
                seen.insert(key)
            })
            .map(|(x, y)| (x.clone(), y.clone()))
            .collect()
    }
}

/// Build pairs for `token_pairs` from current reserves.
///
/// Pools the reader reports as missing are skipped, as are duplicates.
pub fn load_pairs<R: ReserveReader + ?Sized>(
    reader: &R,
    registry: &ChainRegistry,
    token_pairs: &[(Token, Token)],
) -> Result<Vec<Pair>> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for (token_a, token_b) in token_pairs {
        let address = registry.pair_address(token_a, token_b)?;
        if !seen.insert(address) {
            continue;
        }
        let Some((reserve0, reserve1)) = reader.get_reserves(address)? else {
            debug!("no pair for {}/{} at {:?}", token_a, token_b, address);
            continue;
        };

        let (token0, token1) = if token_a.sorts_before(token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let amount0 = CurrencyAmount::from_raw_amount(token0.clone(), u256_to_bigint(reserve0))?;
        let amount1 = CurrencyAmount::from_raw_amount(token1.clone(), u256_to_bigint(reserve1))?;
        pairs.push(registry.pair(amount0, amount1)?);
    }

    debug!("loaded {} of {} candidate pairs", pairs.len(), token_pairs.len());
    Ok(pairs)
}

/// Balance of `account` as an amount of `currency`.
pub fn balance_of<R: ReserveReader + ?Sized>(
    reader: &R,
    account: Address,
    currency: &Currency,
) -> Result<CurrencyAmount> {
    let token = currency.as_token().map(|token| token.address);
    let raw = reader.get_balance(account, token)?;
    CurrencyAmount::from_raw_amount(currency.clone(), u256_to_bigint(raw))
}
