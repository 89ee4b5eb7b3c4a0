//! Configuration types for the Gyro SDK

use std::collections::BTreeMap;
use std::path::Path;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::types::constants::{GAS_LIMIT, GAS_PRICE};
use crate::{Error, Network, ProtocolError};

/// Node connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// JSON-RPC URL (e.g., "http://127.0.0.1:8545")
    pub url: String,

    /// Hex private key of a local signer. Without one, transactions are
    /// signed by the node for the configured account.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,

    /// Account to act as (defaults to the signer or the node's first account)
    pub account: Option<Address>,

    pub request_timeout_secs: u64,

    /// Upper bound for waiting on transaction confirmations
    pub confirmation_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".to_string(),
            private_key: None,
            account: None,
            request_timeout_secs: 30,
            confirmation_timeout_secs: 600,
        }
    }
}

/// Contract addresses of one deployment, keyed by deployment name
/// (`GyroProxy`, `GyroLib`, `pool-gyd_usdc`, `MetaFaucet`, `token-USDC`,
/// `GyroPriceOracle`, ...)
pub type ContractAddresses = BTreeMap<String, Address>;

/// Known deployments per network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployments {
    pub localhost: ContractAddresses,
    pub kovan: ContractAddresses,
}

impl Deployments {
    pub fn for_network(&self, network: Network) -> &ContractAddresses {
        match network {
            Network::Localhost => &self.localhost,
            Network::Kovan => &self.kovan,
        }
    }

    /// Resolve the addresses for a chain id
    pub fn for_chain_id(&self, chain_id: u64) -> Result<&ContractAddresses, ProtocolError> {
        Network::from_chain_id(chain_id).map(|network| self.for_network(network))
    }
}

/// Gas settings attached to submitted transactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub limit: u64,
    pub price: u128,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            limit: GAS_LIMIT,
            price: GAS_PRICE,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub deployments: Deployments,
    pub gas: GasConfig,

    /// Approve a large allowance instead of the exact amount, so that
    /// later mints and redeems skip the approval transaction
    pub approve_future: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            deployments: Deployments::default(),
            gas: GasConfig::default(),
            approve_future: true,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Apply `GYRO_NODE_URL`, `GYRO_PRIVATE_KEY` and `GYRO_ACCOUNT` overrides
    pub fn apply_env(&mut self) -> Result<(), Error> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), Error> {
        if let Some(url) = lookup("GYRO_NODE_URL") {
            self.node.url = url;
        }
        if let Some(key) = lookup("GYRO_PRIVATE_KEY") {
            self.node.private_key = Some(key);
        }
        if let Some(account) = lookup("GYRO_ACCOUNT") {
            let account = account
                .parse()
                .map_err(|e| Error::Config(format!("invalid GYRO_ACCOUNT: {}", e)))?;
            self.node.account = Some(account);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.node.url, "http://127.0.0.1:8545");
        assert_eq!(config.gas.limit, 2_000_000);
        assert_eq!(config.gas.price, 1_000_000_000);
        assert!(config.approve_future);
        assert!(config.deployments.localhost.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "node": { "url": "http://10.0.0.2:8545" },
                "deployments": {
                    "kovan": { "GyroLib": "0x1111111111111111111111111111111111111111" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.node.url, "http://10.0.0.2:8545");
        assert_eq!(config.node.request_timeout_secs, 30);
        assert_eq!(config.gas.limit, 2_000_000);

        let kovan = config.deployments.for_chain_id(42).unwrap();
        assert_eq!(kovan["GyroLib"], Address::repeat_byte(0x11));
        assert!(config.deployments.for_chain_id(1).is_err());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_private_key_not_serialized() {
        let mut config = AppConfig::default();
        config.node.private_key = Some("0xdeadbeef".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("deadbeef"));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| match key {
                "GYRO_NODE_URL" => Some("http://node:8545".into()),
                "GYRO_ACCOUNT" => Some("0x2222222222222222222222222222222222222222".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.node.url, "http://node:8545");
        assert_eq!(config.node.account, Some(Address::repeat_byte(0x22)));
        assert!(config.node.private_key.is_none());

        let err = config
            .apply_overrides(|key| (key == "GYRO_ACCOUNT").then(|| "nope".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
