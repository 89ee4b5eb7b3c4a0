//! Gyro Protocol Client
//!
//! This crate mints and redeems the Gyro stablecoin by orchestrating calls
//! against its deployed contracts.
//!
//! # Protocol Overview
//!
//! - The fund contract holds the reserve and is itself the Gyro ERC20
//! - The library contract mints from, and redeems to, underlying tokens
//! - Reserve pools are Balancer pools valued by the library
//!
//! # Example
//!
//! ```ignore
//! use gyro::Gyro;
//!
//! let gyro = Gyro::create(client, &config, None).await?;
//! let response = gyro.mint(&inputs, None, true).await?;
//! let result = response.wait(None).await?;
//! println!("Minted {}", result.amount_minted.to_decimal_string());
//! ```

pub mod client;
pub mod constants;
pub mod contracts;
pub mod responses;

pub use client::{approval_amount, is_profitable_arbitrage, needs_approval, Gyro};
pub use constants::*;
pub use contracts::GyroInterfaces;
pub use responses::{MintResult, MintTransactionResponse, RedeemResult, RedeemTransactionResponse};
