//! Error types for the Gyro SDK

use thiserror::Error;

/// Core errors that can occur in the SDK
#[derive(Debug, Error)]
pub enum Error {
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by `MonetaryAmount` arithmetic and conversions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("cannot compare monetary amount with different number of decimals ({left} vs {right})")]
    IncompatibleScale { left: u32, right: u32 },

    #[error("value is not a finite number: {value}")]
    NonFinite { value: String },

    #[error("invalid decimal value: {value}")]
    InvalidDecimal { value: String },

    #[error("normalized value {value} does not fit in a 64-bit integer")]
    Overflow { value: String },

    #[error("raw value {value} cannot be represented as uint256")]
    OutOfRange { value: String },
}

/// Failures reported by the ledger-access layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Transaction reverted: {reason}")]
    Revert { reason: String },

    #[error("Insufficient funds: {message}")]
    InsufficientFunds { message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Receipt not found for transaction {tx_hash}")]
    ReceiptNotFound { tx_hash: String },
}

/// Protocol-specific errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("network {chain_id} not supported")]
    NetworkNotSupported { chain_id: u64 },

    #[error("Contract address missing from deployment: {name}")]
    MissingContract { name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

impl AmountError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IncompatibleScale { .. } => "incompatible_scale",
            Self::NonFinite { .. } => "non_finite",
            Self::InvalidDecimal { .. } => "invalid_decimal",
            Self::Overflow { .. } => "overflow",
            Self::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl LedgerError {
    /// Get a stable error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network_error",
            Self::Revert { .. } => "revert",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::Timeout { .. } => "timeout",
            Self::ReceiptNotFound { .. } => "receipt_not_found",
        }
    }

    /// Whether the failure is transient (the caller may decide to retry)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl ProtocolError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NetworkNotSupported { .. } => "network_not_supported",
            Self::MissingContract { .. } => "missing_contract",
            Self::InvalidInput { .. } => "invalid_input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_codes() {
        let err = LedgerError::Revert {
            reason: "slippage".into(),
        };
        assert_eq!(err.error_code(), "revert");
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "Transaction reverted: slippage");

        let err = LedgerError::Network {
            message: "connection refused".into(),
        };
        assert_eq!(err.error_code(), "network_error");
        assert!(err.is_transient());
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: Error = AmountError::IncompatibleScale { left: 18, right: 6 }.into();
        assert!(matches!(
            err,
            Error::Amount(AmountError::IncompatibleScale { left: 18, right: 6 })
        ));

        let err: Error = ProtocolError::NetworkNotSupported { chain_id: 5 }.into();
        assert_eq!(err.to_string(), "Protocol error: network 5 not supported");
    }
}
