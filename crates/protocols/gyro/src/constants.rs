//! Gyro Protocol Constants
//!
//! Deployment keys and fixed contract addresses.

use alloy::primitives::{address, Address};

/// Keys of the deployment address table
pub mod deployment {
    /// Fund contract (proxy), also the Gyro token
    pub const GYRO_PROXY: &str = "GyroProxy";
    pub const GYRO_LIB: &str = "GyroLib";
    /// Gyro/USDC Balancer pool
    pub const GYD_USDC_POOL: &str = "pool-gyd_usdc";
    pub const META_FAUCET: &str = "MetaFaucet";
    pub const GYRO_PRICE_ORACLE: &str = "GyroPriceOracle";
    pub const USDC_TOKEN: &str = "token-USDC";
}

/// DSProxy registry used to resolve Balancer proxies (Kovan)
pub const KOVAN_DS_PROXY_REGISTRY: Address = address!("130767e0cf05469cf11fa3fcf270dfc1f52b9072");

/// Receipt event read after a mint
pub const MINT_EVENT: &str = "Mint";

/// Receipt event read after a redeem
pub const REDEEM_EVENT: &str = "Redeem";

pub const AMOUNT_ARG: &str = "amount";
