//! Submitted, not yet confirmed transactions

use alloy::primitives::TxHash;
use async_trait::async_trait;
use gyro_core::LedgerError;

use crate::receipt::TxReceipt;

/// Handle to a transaction that has been broadcast.
///
/// Implementations resolve once the transaction is mined with the requested
/// number of confirmations. A transaction that was mined but reverted must
/// resolve to [`LedgerError::Revert`], never to a failed receipt.
#[async_trait]
pub trait PendingTransaction: Send + Sync {
    fn tx_hash(&self) -> TxHash;

    /// Wait for the receipt. `None` uses the node client's default depth.
    async fn await_confirmation(&self, confirmations: Option<u64>)
        -> Result<TxReceipt, LedgerError>;
}
