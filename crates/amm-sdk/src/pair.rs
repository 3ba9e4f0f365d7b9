//! Constant-product liquidity pairs.

use crate::amount::CurrencyAmount;
use crate::config::Deployment;
use crate::currency::Token;
use crate::error::{Error, Result};
use crate::fraction::{Fraction, Rounding};
use crate::price::Price;
use crate::types::{keccak256, Address, BigInt, ChainId, BIPS_BASE, MINIMUM_LIQUIDITY};
use crate::utils::sqrt;
use num_traits::{Signed, Zero};
use std::fmt;

/// Deterministic address of the pair contract for two tokens.
///
/// The address is the same regardless of token order:
/// `create2(factory, keccak256(token0 ‖ token1), init_code_hash)`.
pub fn compute_pair_address(deployment: &Deployment, token_a: &Token, token_b: &Token) -> Result<Address> {
    let (token0, token1) = if token_a.sorts_before(token_b)? {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    let mut data = [0u8; 40];
    data[..20].copy_from_slice(token0.address.as_slice());
    data[20..].copy_from_slice(token1.address.as_slice());
    let salt = keccak256(data);
    Ok(deployment
        .factory
        .create2(salt.0, deployment.init_code_hash.0))
}

/// A pool holding reserves of two tokens and pricing swaps along `x * y = k`.
///
/// Tokens are stored in canonical order (`token0` has the lower address), so
/// the order the caller passed them in is not preserved. A pair is a snapshot:
/// it goes stale as soon as on-chain reserves move and is rebuilt, not updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    liquidity_token: Token,
    reserves: [CurrencyAmount; 2],
    fee_bps: u32,
    protocol_fee_divisor: u32,
}

impl Pair {
    /// Create a pair from the reserves of both tokens.
    pub fn new(amount_a: CurrencyAmount, amount_b: CurrencyAmount, deployment: &Deployment) -> Result<Self> {
        let (amount_a, amount_b) = (amount_a.wrapped(), amount_b.wrapped());
        let (token_a, token_b) = (reserve_token(&amount_a), reserve_token(&amount_b));
        let address = compute_pair_address(deployment, token_a, token_b)?;
        Self::with_address(amount_a, amount_b, address, deployment)
    }

    /// Create a pair whose contract address is already known.
    pub fn with_address(
        amount_a: CurrencyAmount,
        amount_b: CurrencyAmount,
        address: Address,
        deployment: &Deployment,
    ) -> Result<Self> {
        let (amount_a, amount_b) = (amount_a.wrapped(), amount_b.wrapped());
        let token_a = reserve_token(&amount_a).clone();
        let reserves = if token_a.sorts_before(reserve_token(&amount_b))? {
            [amount_a, amount_b]
        } else {
            [amount_b, amount_a]
        };
        let liquidity_token = Token::new(
            token_a.chain_id,
            address,
            deployment.lp_decimals,
            deployment.lp_symbol.clone(),
        )?
        .with_name(deployment.lp_name.clone());

        Ok(Self {
            liquidity_token,
            reserves,
            fee_bps: deployment.fee_bps,
            protocol_fee_divisor: deployment.protocol_fee_divisor,
        })
    }

    /// The LP token, whose address is the pair contract address.
    pub fn liquidity_token(&self) -> &Token {
        &self.liquidity_token
    }

    /// Pair contract address.
    pub fn address(&self) -> Address {
        self.liquidity_token.address
    }

    /// Chain the pair is deployed on.
    pub fn chain_id(&self) -> ChainId {
        self.token0().chain_id
    }

    /// Swap fee in basis points.
    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    /// The token that sorts first.
    pub fn token0(&self) -> &Token {
        reserve_token(&self.reserves[0])
    }

    /// The token that sorts second.
    pub fn token1(&self) -> &Token {
        reserve_token(&self.reserves[1])
    }

    /// Reserve of `token0`.
    pub fn reserve0(&self) -> &CurrencyAmount {
        &self.reserves[0]
    }

    /// Reserve of `token1`.
    pub fn reserve1(&self) -> &CurrencyAmount {
        &self.reserves[1]
    }

    /// Check if this pair contains the given token.
    pub fn involves_token(&self, token: &Token) -> bool {
        token == self.token0() || token == self.token1()
    }

    /// Get the other token in the pair.
    pub fn other_token(&self, token: &Token) -> Option<&Token> {
        if token == self.token0() {
            Some(self.token1())
        } else if token == self.token1() {
            Some(self.token0())
        } else {
            None
        }
    }

    /// Reserve of `token`; fails if the pair does not hold it.
    pub fn reserve_of(&self, token: &Token) -> Result<&CurrencyAmount> {
        if token == self.token0() {
            Ok(&self.reserves[0])
        } else if token == self.token1() {
            Ok(&self.reserves[1])
        } else {
            Err(Error::TokenNotInPair(token.address))
        }
    }

    /// Whether either reserve is empty.
    pub fn has_zero_reserve(&self) -> bool {
        self.reserves.iter().any(|reserve| reserve.quotient().is_zero())
    }

    /// Mid price of token0 in terms of token1.
    pub fn token0_price(&self) -> Result<Price> {
        self.mid_price(0)
    }

    /// Mid price of token1 in terms of token0.
    pub fn token1_price(&self) -> Result<Price> {
        self.mid_price(1)
    }

    /// Mid price of `token` in terms of the other token; ignores the fee.
    pub fn price_of(&self, token: &Token) -> Result<Price> {
        if token == self.token0() {
            self.token0_price()
        } else if token == self.token1() {
            self.token1_price()
        } else {
            Err(Error::TokenNotInPair(token.address))
        }
    }

    fn mid_price(&self, base: usize) -> Result<Price> {
        let (base_reserve, quote_reserve) = (&self.reserves[base], &self.reserves[1 - base]);
        if base_reserve.quotient().is_zero() {
            return Err(Error::InsufficientReserves);
        }
        Ok(Price::new(
            base_reserve.currency().clone(),
            quote_reserve.currency().clone(),
            base_reserve.quotient(),
            quote_reserve.quotient(),
        ))
    }

    /// Output of swapping `input_amount` into the pair, and the pair afterwards.
    ///
    /// The fee is taken from the input before the constant-product formula,
    /// and both steps truncate: `in' = floor(in·(B−f)/B)`, then
    /// `out = floor(Rout·in' / (Rin + in'))` with `B = 10000`.
    pub fn get_output_amount(&self, input_amount: &CurrencyAmount) -> Result<(CurrencyAmount, Pair)> {
        let input_amount = input_amount.wrapped();
        let input_token = reserve_token(&input_amount);
        let input_reserve = self.reserve_of(input_token)?;
        let output_reserve = self.opposite_reserve(input_token);
        if self.has_zero_reserve() {
            return Err(Error::InsufficientReserves);
        }

        let (fee_numerator, fee_denominator) = self.input_fraction_after_fee();
        let input_with_fee = input_amount.quotient() * fee_numerator / fee_denominator;
        if !input_with_fee.is_positive() {
            return Err(Error::InsufficientInputAmount);
        }
        let numerator = output_reserve.quotient() * &input_with_fee;
        let denominator = input_reserve.quotient() + &input_with_fee;
        let output = numerator / denominator;

        if !output.is_positive() {
            return Err(Error::InsufficientInputAmount);
        }
        if output >= output_reserve.quotient() {
            return Err(Error::InsufficientReserves);
        }

        let output_amount = CurrencyAmount::from_raw_amount(output_reserve.currency().clone(), output)?;
        let next = self.with_reserves(
            input_reserve.add(&input_amount)?,
            output_reserve.subtract(&output_amount)?,
        );
        Ok((output_amount, next))
    }

    /// Smallest input that buys `output_amount`, and the pair afterwards.
    ///
    /// Rounds up: `in = ceil(Rin·out·B / ((Rout−out)·(B−f)))`, so paying the
    /// returned amount never falls short on-chain.
    pub fn get_input_amount(&self, output_amount: &CurrencyAmount) -> Result<(CurrencyAmount, Pair)> {
        let output_amount = output_amount.wrapped();
        let output_token = reserve_token(&output_amount);
        let output_reserve = self.reserve_of(output_token)?;
        let input_reserve = self.opposite_reserve(output_token);

        let output = output_amount.quotient();
        if !output.is_positive() {
            return Err(Error::InsufficientInputAmount);
        }
        if self.has_zero_reserve() || output >= output_reserve.quotient() {
            return Err(Error::InsufficientReserves);
        }

        let (fee_numerator, fee_denominator) = self.input_fraction_after_fee();
        let numerator = input_reserve.quotient() * &output * fee_denominator;
        let denominator = (output_reserve.quotient() - &output) * fee_numerator;
        if denominator.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let input = Fraction::new(numerator, denominator).quotient_rounded(Rounding::RoundUp);

        let input_amount = CurrencyAmount::from_raw_amount(input_reserve.currency().clone(), input)?;
        let next = self.with_reserves(
            input_reserve.add(&input_amount)?,
            output_reserve.subtract(&output_amount)?,
        );
        Ok((input_amount, next))
    }

    /// LP tokens minted for depositing `amount_a` and `amount_b`.
    ///
    /// The first deposit mints `sqrt(a·b)` minus the permanently locked
    /// minimum liquidity; later deposits mint the smaller pro-rata share.
    pub fn get_liquidity_minted(
        &self,
        total_supply: &CurrencyAmount,
        amount_a: &CurrencyAmount,
        amount_b: &CurrencyAmount,
    ) -> Result<CurrencyAmount> {
        self.ensure_liquidity_token(total_supply)?;
        let (amount_a, amount_b) = (amount_a.wrapped(), amount_b.wrapped());
        let (amount0, amount1) = if reserve_token(&amount_a).sorts_before(reserve_token(&amount_b))? {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        if reserve_token(&amount0) != self.token0() || reserve_token(&amount1) != self.token1() {
            return Err(Error::TokenNotInPair(reserve_token(&amount0).address));
        }

        let supply = total_supply.quotient();
        let liquidity = if supply.is_zero() {
            sqrt(&(amount0.quotient() * amount1.quotient())) - MINIMUM_LIQUIDITY
        } else {
            if self.has_zero_reserve() {
                return Err(Error::InsufficientReserves);
            }
            let share0 = amount0.quotient() * &supply / self.reserves[0].quotient();
            let share1 = amount1.quotient() * &supply / self.reserves[1].quotient();
            share0.min(share1)
        };

        if !liquidity.is_positive() {
            return Err(Error::InsufficientInputAmount);
        }
        CurrencyAmount::from_raw_amount(self.liquidity_token.clone(), liquidity)
    }

    /// Amount of `token` redeemable for `liquidity` LP tokens.
    ///
    /// With the protocol fee on, the fee share accrued since `k_last` is
    /// minted into the supply first, diluting every holder.
    pub fn get_liquidity_value(
        &self,
        token: &Token,
        total_supply: &CurrencyAmount,
        liquidity: &CurrencyAmount,
        fee_on: bool,
        k_last: Option<&BigInt>,
    ) -> Result<CurrencyAmount> {
        let reserve = self.reserve_of(token)?;
        self.ensure_liquidity_token(total_supply)?;
        self.ensure_liquidity_token(liquidity)?;
        if liquidity.quotient() > total_supply.quotient() {
            return Err(Error::LiquidityExceedsSupply);
        }

        let mut supply = total_supply.quotient();
        if fee_on {
            let k_last = k_last.ok_or(Error::InvalidOptions("k_last is required when the protocol fee is on"))?;
            if !k_last.is_zero() {
                let root_k = sqrt(&(self.reserves[0].quotient() * self.reserves[1].quotient()));
                let root_k_last = sqrt(k_last);
                if root_k > root_k_last {
                    let numerator = &supply * (&root_k - &root_k_last);
                    let denominator = &root_k * self.protocol_fee_divisor + &root_k_last;
                    supply += numerator / denominator;
                }
            }
        }
        if supply.is_zero() {
            return Err(Error::InsufficientReserves);
        }

        let value = reserve.quotient() * liquidity.quotient() / supply;
        CurrencyAmount::from_raw_amount(token.clone(), value)
    }

    fn opposite_reserve(&self, token: &Token) -> &CurrencyAmount {
        if token == self.token0() {
            &self.reserves[1]
        } else {
            &self.reserves[0]
        }
    }

    /// Share of an input that reaches the reserves, as `(numerator, denominator)`.
    pub fn input_fraction_after_fee(&self) -> (u64, u64) {
        (BIPS_BASE.saturating_sub(u64::from(self.fee_bps)), BIPS_BASE)
    }

    fn with_reserves(&self, amount_a: CurrencyAmount, amount_b: CurrencyAmount) -> Pair {
        let reserves = if reserve_token(&amount_a) == self.token0() {
            [amount_a, amount_b]
        } else {
            [amount_b, amount_a]
        };
        Pair {
            liquidity_token: self.liquidity_token.clone(),
            reserves,
            fee_bps: self.fee_bps,
            protocol_fee_divisor: self.protocol_fee_divisor,
        }
    }

    fn ensure_liquidity_token(&self, amount: &CurrencyAmount) -> Result<()> {
        match amount.token() {
            Some(token) if *token == self.liquidity_token => Ok(()),
            _ => Err(Error::CurrencyMismatch {
                left: self.liquidity_token.symbol.clone(),
                right: amount.currency().to_string(),
            }),
        }
    }
}

/// The token behind an already wrapped reserve amount.
fn reserve_token(amount: &CurrencyAmount) -> &Token {
    amount.currency().wrapped()
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token0(), self.token1())
    }
}
