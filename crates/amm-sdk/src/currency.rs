//! Currencies: native chain assets and contract-backed tokens.

use crate::error::{Error, Result};
use crate::types::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::warn;

/// Decimals must stay below this bound.
const MAX_DECIMALS: u8 = 255;

/// Parse an address and return it in checksummed form.
///
/// All-lowercase and all-uppercase input is accepted as-is; mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn validate_and_parse_address(value: &str) -> Result<Address> {
    let address =
        Address::from_str(value).map_err(|_| Error::InvalidAddress(value.to_string()))?;
    let checksummed = address.to_checksum(None);
    let hex = value.strip_prefix("0x").unwrap_or(value);

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        if checksummed[2..] != *hex {
            return Err(Error::InvalidAddress(value.to_string()));
        }
    } else {
        warn!("address {} is not checksummed", value);
    }

    Ok(address)
}

/// A contract-backed token.
///
/// Two tokens are equal when they share chain id and address; metadata is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: Option<String>,
    pub logo_uri: Option<String>,
    pub project_link: Option<String>,
}

impl Token {
    /// Create a token from an already parsed address.
    pub fn new(
        chain_id: ChainId,
        address: Address,
        decimals: u8,
        symbol: impl Into<String>,
    ) -> Result<Self> {
        if decimals >= MAX_DECIMALS {
            return Err(Error::InvalidDecimals(decimals));
        }
        Ok(Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.into(),
            name: None,
            logo_uri: None,
            project_link: None,
        })
    }

    /// Create an ERC-20 token from a textual address, validating its checksum.
    pub fn erc20(
        chain_id: ChainId,
        address: &str,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let address = validate_and_parse_address(address)?;
        Ok(Self::new(chain_id, address, decimals, symbol)?.with_name(name))
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_logo_uri(mut self, logo_uri: impl Into<String>) -> Self {
        self.logo_uri = Some(logo_uri.into());
        self
    }

    pub fn with_project_link(mut self, project_link: impl Into<String>) -> Self {
        self.project_link = Some(project_link.into());
        self
    }

    /// EIP-55 rendering of the address.
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Whether this token's address sorts before the other's.
    ///
    /// Byte order equals the order of the lowercase hex strings.
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        if self.chain_id != other.chain_id {
            return Err(Error::ChainMismatch {
                expected: self.chain_id,
                found: other.chain_id,
            });
        }
        if self.address == other.address {
            return Err(Error::IdenticalAddresses(self.address));
        }
        Ok(self.address < other.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// The gas asset of a chain, together with its canonical wrapped token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub chain_id: ChainId,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    pub logo_uri: Option<String>,
    wrapped: Token,
}

impl NativeCurrency {
    /// Native currency on the chain of its `wrapped` token.
    pub fn new(
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
        wrapped: Token,
    ) -> Result<Self> {
        if decimals >= MAX_DECIMALS {
            return Err(Error::InvalidDecimals(decimals));
        }
        Ok(Self {
            chain_id: wrapped.chain_id,
            decimals,
            symbol: symbol.into(),
            name: name.into(),
            logo_uri: None,
            wrapped,
        })
    }

    pub fn with_logo_uri(mut self, logo_uri: impl Into<String>) -> Self {
        self.logo_uri = Some(logo_uri.into());
        self
    }

    /// The wrapped ERC-20 token of this currency.
    pub fn wrapped(&self) -> &Token {
        &self.wrapped
    }
}

impl PartialEq for NativeCurrency {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id
    }
}

impl Eq for NativeCurrency {}

/// Either a native asset or a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Native(NativeCurrency),
    Token(Token),
}

impl Currency {
    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Currency::Token(_))
    }

    /// Chain of the currency.
    pub fn chain_id(&self) -> ChainId {
        match self {
            Currency::Native(native) => native.chain_id,
            Currency::Token(token) => token.chain_id,
        }
    }

    /// Number of decimals of the smallest unit.
    pub fn decimals(&self) -> u8 {
        match self {
            Currency::Native(native) => native.decimals,
            Currency::Token(token) => token.decimals,
        }
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        match self {
            Currency::Native(native) => &native.symbol,
            Currency::Token(token) => &token.symbol,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Currency::Native(native) => Some(&native.name),
            Currency::Token(token) => token.name.as_deref(),
        }
    }

    /// The token to use with pair contracts; a token wraps to itself.
    pub fn wrapped(&self) -> &Token {
        match self {
            Currency::Native(native) => native.wrapped(),
            Currency::Token(token) => token,
        }
    }

    /// The token, unless this is the native currency.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Currency::Token(token) => Some(token),
            Currency::Native(_) => None,
        }
    }

    /// Same variant, same chain and, for tokens, same address.
    pub fn equals(&self, other: &Currency) -> bool {
        self == other
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Currency::Native(native) => {
                0u8.hash(state);
                native.chain_id.hash(state);
            }
            Currency::Token(token) => {
                1u8.hash(state);
                token.hash(state);
            }
        }
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}

impl From<&Token> for Currency {
    fn from(token: &Token) -> Self {
        Currency::Token(token.clone())
    }
}

impl From<NativeCurrency> for Currency {
    fn from(native: NativeCurrency) -> Self {
        Currency::Native(native)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chains;

    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

    fn weth() -> Token {
        Token::erc20(chains::ETHEREUM, WETH, 18, "WETH", "Wrapped Ether").unwrap()
    }

    #[test]
    fn test_checksum_normalization() {
        let lower = Token::erc20(chains::ETHEREUM, &WETH.to_lowercase(), 18, "WETH", "Wrapped Ether")
            .unwrap();
        assert_eq!(lower.checksum_address(), WETH);
        assert_eq!(lower, weth());
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(matches!(
            validate_and_parse_address("0xabc"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            validate_and_parse_address("not an address"),
            Err(Error::InvalidAddress(_))
        ));
        // Flip the case of one letter to break the checksum.
        let broken = WETH.replacen("C02aaA", "c02aaA", 1);
        assert!(matches!(
            validate_and_parse_address(&broken),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_invalid_decimals() {
        assert!(matches!(
            Token::new(1, Address::repeat_byte(0x01), 255, "BAD"),
            Err(Error::InvalidDecimals(255))
        ));
    }

    #[test]
    fn test_token_equality_ignores_metadata_but_not_chain() {
        let a = Token::new(1, Address::repeat_byte(0x01), 18, "A").unwrap();
        let renamed = Token::new(1, Address::repeat_byte(0x01), 6, "B").unwrap();
        let other_chain = Token::new(5, Address::repeat_byte(0x01), 18, "A").unwrap();

        assert_eq!(a, renamed);
        assert_ne!(a, other_chain);
    }

    #[test]
    fn test_sorts_before() {
        let a = Token::new(1, Address::repeat_byte(0x01), 18, "A").unwrap();
        let b = Token::new(1, Address::repeat_byte(0x02), 18, "B").unwrap();
        let c = Token::new(5, Address::repeat_byte(0x03), 18, "C").unwrap();

        assert!(a.sorts_before(&b).unwrap());
        assert!(!b.sorts_before(&a).unwrap());
        assert!(matches!(a.sorts_before(&a), Err(Error::IdenticalAddresses(_))));
        assert!(matches!(a.sorts_before(&c), Err(Error::ChainMismatch { .. })));
    }

    #[test]
    fn test_native_currency() {
        let eth = NativeCurrency::new(18, "ETH", "Ether", weth()).unwrap();
        let native: Currency = eth.clone().into();
        let token: Currency = weth().into();

        assert!(native.is_native());
        assert!(token.is_token());
        assert_eq!(native.wrapped(), &weth());
        assert_eq!(token.wrapped(), &weth());
        assert!(!native.equals(&token));
        assert!(native.equals(&Currency::Native(eth)));
        assert_eq!(native.chain_id(), chains::ETHEREUM);
    }
}
