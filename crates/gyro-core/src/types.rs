//! Core type definitions for the Gyro SDK

use std::fmt;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{AmountInput, MonetaryAmount, ProtocolError};

/// Deployment network of the Gyro contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Localhost,
    Kovan,
}

impl Network {
    /// Resolve the deployment network from a node's chain id
    pub fn from_chain_id(chain_id: u64) -> Result<Self, ProtocolError> {
        match chain_id {
            1337 | 31337 => Ok(Self::Localhost),
            42 => Ok(Self::Kovan),
            _ => Err(ProtocolError::NetworkNotSupported { chain_id }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Localhost => "localhost",
            Self::Kovan => "kovan",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ERC20 token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A token given either by address (decimals looked up on chain) or with
/// its metadata already known
#[derive(Debug, Clone)]
pub enum TokenRef {
    Address(Address),
    Token(Token),
}

impl TokenRef {
    pub fn address(&self) -> Address {
        match self {
            Self::Address(address) => *address,
            Self::Token(token) => token.address,
        }
    }
}

impl From<Address> for TokenRef {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<Token> for TokenRef {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

/// A token paired with an amount, used as mint input or redeem output
#[derive(Debug, Clone)]
pub struct TokenWithAmount {
    pub token: Address,
    pub amount: AmountInput,
}

impl TokenWithAmount {
    pub fn new(token: Address, amount: impl Into<AmountInput>) -> Self {
        Self {
            token,
            amount: amount.into(),
        }
    }
}

/// One reserve pool as reported by the library contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reserve {
    pub error_code: u64,
    pub address: Address,
    pub amount: MonetaryAmount,
    pub tokens: Vec<Address>,
    pub token_symbols: Vec<String>,
}

/// Constants
pub mod constants {
    use super::U256;

    /// Decimals of the Gyro token
    pub const DECIMALS: u32 = 18;

    /// Gas limit attached to mint and redeem calls
    pub const GAS_LIMIT: u64 = 2_000_000;

    /// Gas price (1 gwei) attached to mint, redeem and approve calls
    pub const GAS_PRICE: u128 = 1_000_000_000;

    /// Allowance granted when approving for future operations is `10^50`
    pub const APPROVE_FUTURE_EXPONENT: u64 = 50;

    pub fn approve_future_amount() -> U256 {
        U256::from(10u64).pow(U256::from(APPROVE_FUTURE_EXPONENT))
    }
}
