//! Transaction receipts
//!
//! Only the parts of a receipt the SDK reads are kept: the hash, the block
//! it was mined in, the execution status and the ordered logs. Logs stay
//! opaque until a decode is attempted.

use alloy::primitives::{Log, TxHash};
use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;

/// Confirmed outcome of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
    pub logs: Vec<Log>,
}

impl TxReceipt {
    pub fn new(tx_hash: TxHash, block_number: Option<u64>, success: bool, logs: Vec<Log>) -> Self {
        Self {
            tx_hash,
            block_number,
            success,
            logs,
        }
    }

    /// Convert an RPC receipt, keeping logs in emission order
    pub fn from_rpc(receipt: &TransactionReceipt) -> Self {
        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect();

        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.inner.status(),
            logs,
        }
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
    }
}
