//! Mapping of provider failures onto [`LedgerError`]
//!
//! alloy reports reverts in two places: as decoded contract errors, and as
//! JSON-RPC error responses carrying revert data (or an "execution reverted"
//! message, depending on the node). Both become [`LedgerError::Revert`].

use alloy::contract::Error as ContractError;
use alloy::providers::PendingTransactionError;
use alloy::rpc::json_rpc::ErrorPayload;
use alloy::sol_types::decode_revert_reason;
use alloy::transports::{RpcError, TransportError};
use gyro_core::LedgerError;

/// Failures that can be classified as a ledger error
pub trait ClassifyError {
    fn classify(&self) -> LedgerError;
}

impl ClassifyError for TransportError {
    fn classify(&self) -> LedgerError {
        match self {
            RpcError::ErrorResp(payload) => classify_error_payload(payload),
            other => LedgerError::Network {
                message: other.to_string(),
            },
        }
    }
}

impl ClassifyError for ContractError {
    fn classify(&self) -> LedgerError {
        classify_contract_error(self)
    }
}

impl ClassifyError for PendingTransactionError {
    fn classify(&self) -> LedgerError {
        match self {
            PendingTransactionError::TransportError(err) => err.classify(),
            other => LedgerError::Network {
                message: other.to_string(),
            },
        }
    }
}

/// Classify an error raised by a contract call or transaction submission
pub fn classify_contract_error(err: &ContractError) -> LedgerError {
    match err {
        ContractError::TransportError(err) => err.classify(),
        ContractError::PendingTransactionError(err) => err.classify(),
        // Empty return data from a call: the contract reverted without a
        // reason or is not deployed at that address.
        ContractError::ZeroData(..) | ContractError::ContractNotDeployed => LedgerError::Revert {
            reason: err.to_string(),
        },
        other => LedgerError::Network {
            message: other.to_string(),
        },
    }
}

fn classify_error_payload(payload: &ErrorPayload) -> LedgerError {
    match payload.as_revert_data() {
        Some(data) => {
            let reason = decode_revert_reason(&data).unwrap_or_else(|| payload.message.to_string());
            tracing::debug!(code = payload.code, %reason, "RPC error carries revert data");
            LedgerError::Revert { reason }
        }
        None => classify_rpc_message(&payload.message),
    }
}

/// Classify a node error message by its content
pub fn classify_rpc_message(message: &str) -> LedgerError {
    let lower = message.to_lowercase();

    if lower.contains("insufficient funds") {
        LedgerError::InsufficientFunds {
            message: message.to_string(),
        }
    } else if lower.contains("revert") {
        LedgerError::Revert {
            reason: revert_reason(message),
        }
    } else {
        LedgerError::Network {
            message: message.to_string(),
        }
    }
}

/// Strip the node's "execution reverted:" style prefix
fn revert_reason(message: &str) -> String {
    message
        .split_once("reverted:")
        .map(|(_, reason)| reason.trim())
        .filter(|reason| !reason.is_empty())
        .unwrap_or(message)
        .to_string()
}
