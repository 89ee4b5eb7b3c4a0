//! evm-tx: Receipt parsing and transaction settlement for EVM contracts
//!
//! Decodes event logs against ordered lists of contract interfaces and
//! settles a primary transaction together with its auxiliary approvals.

pub mod interface;
pub mod logs;
pub mod pending;
pub mod receipt;
pub mod response;

#[cfg(test)]
mod testing;

pub use interface::{
    ContractInterface, DecodeFailure, DecodedLog, InterfaceError, InterfaceSet, LogDecoder,
};
pub use logs::{
    decode_log, decode_logs, extract_event_amount, extract_event_value, find_event,
    find_event_from, parse_logs, EventMatch,
};
pub use pending::PendingTransaction;
pub use receipt::TxReceipt;
pub use response::{EventExtraction, Settlement, TransactionResponse};
