//! Pending transactions backed by the alloy provider

use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::{
    DynProvider, PendingTransactionBuilder, PendingTransactionError, Provider, WatchTxError,
};
use async_trait::async_trait;
use evm_tx::{PendingTransaction, TxReceipt};
use gyro_core::LedgerError;

use crate::errors::ClassifyError;

/// A broadcast transaction, re-attached to the provider when awaited
#[derive(Clone)]
pub struct AlloyPendingTransaction {
    provider: DynProvider,
    tx_hash: TxHash,
    default_confirmations: u64,
    timeout: Duration,
}

impl AlloyPendingTransaction {
    pub fn new(provider: DynProvider, tx_hash: TxHash, timeout: Duration) -> Self {
        Self {
            provider,
            tx_hash,
            default_confirmations: 1,
            timeout,
        }
    }

    #[must_use]
    pub fn with_default_confirmations(mut self, confirmations: u64) -> Self {
        self.default_confirmations = confirmations.max(1);
        self
    }

    fn map_watch_error(&self, err: PendingTransactionError) -> LedgerError {
        match err {
            PendingTransactionError::TxWatcher(WatchTxError::Timeout) => LedgerError::Timeout {
                seconds: self.timeout.as_secs(),
            },
            other => other.classify(),
        }
    }
}

#[async_trait]
impl PendingTransaction for AlloyPendingTransaction {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn await_confirmation(
        &self,
        confirmations: Option<u64>,
    ) -> Result<TxReceipt, LedgerError> {
        let confirmations = confirmations.unwrap_or(self.default_confirmations);
        tracing::debug!(tx_hash = %self.tx_hash, confirmations, "Waiting for receipt");

        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), self.tx_hash)
            .with_required_confirmations(confirmations)
            .with_timeout(Some(self.timeout))
            .get_receipt()
            .await
            .map_err(|e| self.map_watch_error(e))?;

        let receipt = TxReceipt::from_rpc(&receipt);
        if !receipt.success {
            tracing::warn!(tx_hash = %self.tx_hash, block = ?receipt.block_number, "Transaction reverted");
            return Err(LedgerError::Revert {
                reason: format!("transaction {} failed on chain", self.tx_hash),
            });
        }

        tracing::debug!(
            tx_hash = %self.tx_hash,
            block = ?receipt.block_number,
            logs = receipt.logs.len(),
            "Transaction confirmed"
        );
        Ok(receipt)
    }
}

impl std::fmt::Debug for AlloyPendingTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyPendingTransaction")
            .field("tx_hash", &self.tx_hash)
            .field("default_confirmations", &self.default_confirmations)
            .field("timeout", &self.timeout)
            .finish()
    }
}
