//! evm-node-client: Wrapper around an alloy JSON-RPC provider
//!
//! This crate provides a high-level client for interacting with an Ethereum
//! node: request timeouts, local or node-managed signing accounts, pending
//! transactions and classification of node failures.

pub mod errors;
pub mod pending;
pub mod status;

use std::future::IntoFuture;
use std::str::FromStr;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use evm_tx::TxReceipt;
use gyro_core::{Error, LedgerError, NodeConfig};

pub use errors::{classify_contract_error, classify_rpc_message, ClassifyError};
pub use pending::AlloyPendingTransaction;
pub use status::{detect_status, NodeStatus, SyncTier};

/// Result type for node client operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// High-level EVM node client
#[derive(Clone)]
pub struct NodeClient {
    provider: DynProvider,
    signer: Option<Address>,
    config: NodeConfig,
}

impl NodeClient {
    /// Build an HTTP provider for `config.url`, with a local signer when a
    /// private key is configured. No request is made.
    pub fn connect(config: NodeConfig) -> std::result::Result<Self, Error> {
        let url = Url::parse(&config.url)
            .map_err(|e| Error::Config(format!("invalid node url {}: {}", config.url, e)))?;

        let (provider, signer) = match config.private_key.as_deref() {
            Some(key) => {
                let signer = PrivateKeySigner::from_str(key.trim())
                    .map_err(|e| Error::Config(format!("invalid private key: {}", e)))?;
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (provider, Some(address))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        tracing::debug!(url = %config.url, signer = ?signer, "Node client configured");

        Ok(Self {
            provider,
            signer,
            config,
        })
    }

    /// Get the underlying provider (for contract bindings)
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Address of the local signer, if one is configured
    pub fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.config.confirmation_timeout_secs)
    }

    /// Run a provider or contract call bounded by the request timeout
    pub async fn request<F, T, E>(&self, fut: F) -> Result<T>
    where
        F: IntoFuture<Output = std::result::Result<T, E>>,
        E: ClassifyError,
    {
        timed_request(self.request_timeout(), fut).await
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.request(self.provider.get_chain_id()).await
    }

    /// Get current block number
    pub async fn current_height(&self) -> Result<u64> {
        self.request(self.provider.get_block_number()).await
    }

    /// Check if node is online
    pub async fn is_online(&self) -> bool {
        self.current_height().await.is_ok()
    }

    pub async fn status(&self) -> NodeStatus {
        detect_status(&self.provider).await
    }

    /// Accounts managed by the node (unlocked development accounts)
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        self.request(self.provider.get_accounts()).await
    }

    /// Account to act as: the local signer, then the configured account,
    /// then the node's first account.
    pub async fn default_account(&self) -> Result<Option<Address>> {
        if let Some(address) = self.signer.or(self.config.account) {
            return Ok(Some(address));
        }
        Ok(self.accounts().await?.into_iter().next())
    }

    /// Receipt of a mined transaction, `None` if unknown or still pending
    pub async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        let receipt = self
            .request(self.provider.get_transaction_receipt(tx_hash))
            .await?;
        Ok(receipt.as_ref().map(TxReceipt::from_rpc))
    }

    /// Like [`NodeClient::get_receipt`], failing when the receipt is missing
    pub async fn require_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        self.get_receipt(tx_hash)
            .await?
            .ok_or_else(|| LedgerError::ReceiptNotFound {
                tx_hash: tx_hash.to_string(),
            })
    }

    /// Handle to await an already broadcast transaction
    pub fn pending(&self, tx_hash: TxHash) -> AlloyPendingTransaction {
        AlloyPendingTransaction::new(self.provider.clone(), tx_hash, self.confirmation_timeout())
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("url", &self.config.url)
            .field("signer", &self.signer)
            .finish()
    }
}

/// Wrap a node call with a timeout. Converts both timeout and node errors to LedgerError.
pub async fn timed_request<F, T, E>(timeout: Duration, fut: F) -> Result<T>
where
    F: IntoFuture<Output = std::result::Result<T, E>>,
    E: ClassifyError,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| LedgerError::Timeout {
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| e.classify())
}
