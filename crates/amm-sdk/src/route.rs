//! Paths through one or more pairs.

use crate::currency::{Currency, Token};
use crate::error::{Error, Result};
use crate::pair::Pair;
use crate::price::Price;
use crate::types::ChainId;
use std::fmt;

/// An ordered, connected list of pairs from an input to an output currency.
///
/// `path` holds the wrapped token entering each hop followed by the final
/// output token, so it is always one longer than `pairs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pairs: Vec<Pair>,
    path: Vec<Token>,
    input: Currency,
    output: Currency,
}

impl Route {
    /// Build a route, checking that every hop connects to the next.
    ///
    /// When `output` is `None` it is whatever token the last pair yields.
    pub fn new(pairs: Vec<Pair>, input: impl Into<Currency>, output: Option<Currency>) -> Result<Self> {
        let input = input.into();
        let first = pairs.first().ok_or(Error::EmptyRoute)?;
        let chain_id = first.chain_id();

        if let Some(pair) = pairs.iter().find(|pair| pair.chain_id() != chain_id) {
            return Err(Error::ChainMismatch {
                expected: chain_id,
                found: pair.chain_id(),
            });
        }
        if input.chain_id() != chain_id {
            return Err(Error::ChainMismatch {
                expected: chain_id,
                found: input.chain_id(),
            });
        }
        if !first.involves_token(input.wrapped()) {
            return Err(Error::InvalidRouteInput);
        }
        if let Some(output) = &output {
            let last = &pairs[pairs.len() - 1];
            if !last.involves_token(output.wrapped()) {
                return Err(Error::InvalidRouteOutput);
            }
        }

        let mut path = Vec::with_capacity(pairs.len() + 1);
        path.push(input.wrapped().clone());
        for (hop, pair) in pairs.iter().enumerate() {
            let current = &path[hop];
            let next = pair
                .other_token(current)
                .ok_or(Error::DisconnectedRoute(hop))?
                .clone();
            path.push(next);
        }

        let last_token = &path[path.len() - 1];
        let output = match output {
            Some(output) if output.wrapped() != last_token => return Err(Error::InvalidRouteOutput),
            Some(output) => output,
            None => Currency::Token(last_token.clone()),
        };

        Ok(Self {
            pairs,
            path,
            input,
            output,
        })
    }

    /// Pairs in hop order.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Tokens visited by the route, input first.
    pub fn path(&self) -> &[Token] {
        &self.path
    }

    /// Currency the route starts from.
    pub fn input(&self) -> &Currency {
        &self.input
    }

    /// Currency the route ends in.
    pub fn output(&self) -> &Currency {
        &self.output
    }

    /// Chain shared by every pair.
    pub fn chain_id(&self) -> ChainId {
        self.pairs[0].chain_id()
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Routes are never empty; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Product of every hop's mid price, in output per input.
    pub fn mid_price(&self) -> Result<Price> {
        let mut prices = self
            .pairs
            .iter()
            .zip(&self.path)
            .map(|(pair, token_in)| pair.price_of(token_in));

        let mut price = prices.next().ok_or(Error::EmptyRoute)??;
        for next in prices {
            price = price.multiply(&next?)?;
        }

        let raw = price.raw();
        Ok(Price::new(
            self.input.clone(),
            self.output.clone(),
            raw.denominator().clone(),
            raw.numerator().clone(),
        ))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.path.iter().map(|token| token.symbol.as_str()).collect();
        write!(f, "{}", symbols.join(" > "))
    }
}
