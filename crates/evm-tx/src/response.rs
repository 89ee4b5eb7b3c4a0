//! Settlement of a primary transaction and its auxiliaries
//!
//! A contract call often needs preparatory transactions (token approvals)
//! submitted just before it. [`TransactionResponse`] groups them and, once
//! every one is confirmed, reads the amount the primary call produced from
//! its receipt.

use alloy::primitives::TxHash;
use futures::future::{try_join, try_join_all};
use gyro_core::{LedgerError, MonetaryAmount};
use serde::Serialize;

use crate::interface::InterfaceSet;
use crate::logs::extract_event_amount;
use crate::pending::PendingTransaction;
use crate::receipt::TxReceipt;

/// Where in the primary receipt the resulting amount is found
#[derive(Debug, Clone)]
pub struct EventExtraction {
    pub event_name: String,
    pub arg_name: String,
    pub decimals: u32,
    pub interfaces: InterfaceSet,
}

impl EventExtraction {
    pub fn new(
        event_name: impl Into<String>,
        arg_name: impl Into<String>,
        decimals: u32,
        interfaces: InterfaceSet,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            arg_name: arg_name.into(),
            decimals,
            interfaces,
        }
    }

    /// Amount reported by the primary receipt, zero if the event is absent
    pub fn extract(&self, receipt: &TxReceipt) -> MonetaryAmount {
        extract_event_amount(
            receipt.logs(),
            &self.event_name,
            &self.arg_name,
            self.decimals,
            &self.interfaces,
        )
    }
}

/// Outcome of a fully confirmed [`TransactionResponse`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub amount: MonetaryAmount,
    pub primary_receipt: TxReceipt,
    /// In submission order
    pub auxiliary_receipts: Vec<TxReceipt>,
}

pub struct TransactionResponse {
    primary: Box<dyn PendingTransaction>,
    auxiliary: Vec<Box<dyn PendingTransaction>>,
    extraction: EventExtraction,
}

impl TransactionResponse {
    pub fn new(
        primary: Box<dyn PendingTransaction>,
        auxiliary: Vec<Box<dyn PendingTransaction>>,
        extraction: EventExtraction,
    ) -> Self {
        Self {
            primary,
            auxiliary,
            extraction,
        }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.primary.tx_hash()
    }

    pub fn auxiliary_hashes(&self) -> Vec<TxHash> {
        self.auxiliary.iter().map(|tx| tx.tx_hash()).collect()
    }

    /// Wait for the primary and every auxiliary transaction concurrently.
    ///
    /// Fails with the first error any of them reports. Only the primary
    /// receipt is scanned for the resulting amount.
    pub async fn wait(self, confirmations: Option<u64>) -> Result<Settlement, LedgerError> {
        let tx_hash = self.tx_hash();
        tracing::debug!(
            %tx_hash,
            auxiliary = self.auxiliary.len(),
            ?confirmations,
            "Awaiting transaction settlement"
        );

        let primary = self.primary.await_confirmation(confirmations);
        let auxiliary = try_join_all(
            self.auxiliary
                .iter()
                .map(|tx| tx.await_confirmation(confirmations)),
        );

        let (primary_receipt, auxiliary_receipts) =
            try_join(primary, auxiliary).await.map_err(|e| {
                tracing::warn!(%tx_hash, error = %e, "Transaction settlement failed");
                e
            })?;

        let amount = self.extraction.extract(&primary_receipt);
        tracing::info!(
            %tx_hash,
            block = ?primary_receipt.block_number,
            amount = %amount.to_decimal_string(),
            "Transaction settled"
        );

        Ok(Settlement {
            amount,
            primary_receipt,
            auxiliary_receipts,
        })
    }
}

impl std::fmt::Debug for TransactionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionResponse")
            .field("tx_hash", &self.tx_hash())
            .field("auxiliary", &self.auxiliary_hashes())
            .field("extraction", &self.extraction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use alloy::primitives::{Address, Log, B256};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct MockPending {
        hash: TxHash,
        outcome: Result<TxReceipt, LedgerError>,
        seen: Arc<Mutex<Vec<Option<u64>>>>,
    }

    impl MockPending {
        fn mined(byte: u8, logs: Vec<Log>) -> Self {
            let hash = B256::repeat_byte(byte);
            Self {
                hash,
                outcome: Ok(TxReceipt::new(hash, Some(100), true, logs)),
                seen: Arc::default(),
            }
        }

        fn failing(byte: u8, error: LedgerError) -> Self {
            Self {
                hash: B256::repeat_byte(byte),
                outcome: Err(error),
                seen: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl PendingTransaction for MockPending {
        fn tx_hash(&self) -> TxHash {
            self.hash
        }

        async fn await_confirmation(
            &self,
            confirmations: Option<u64>,
        ) -> Result<TxReceipt, LedgerError> {
            self.seen.lock().unwrap().push(confirmations);
            self.outcome.clone()
        }
    }

    fn mint_extraction() -> EventExtraction {
        EventExtraction::new(
            "Mint",
            "amount",
            18,
            InterfaceSet::new()
                .with(gyro_lib_interface())
                .with(erc20_interface()),
        )
    }

    fn lib() -> Address {
        Address::repeat_byte(0x10)
    }

    fn user() -> Address {
        Address::repeat_byte(0x01)
    }

    fn revert() -> LedgerError {
        LedgerError::Revert {
            reason: "slippage".to_string(),
        }
    }

    #[tokio::test]
    async fn test_wait_extracts_amount_from_primary() {
        let usdc = Address::repeat_byte(0xaa);
        let primary = MockPending::mined(
            0x01,
            vec![
                unrelated_log(),
                transfer_log(usdc, user(), lib(), 1000),
                mint_log(lib(), user(), 42),
            ],
        );
        let approve = MockPending::mined(0x02, vec![transfer_log(usdc, user(), lib(), 5)]);

        let response = TransactionResponse::new(
            Box::new(primary),
            vec![Box::new(approve)],
            mint_extraction(),
        );
        assert_eq!(response.tx_hash(), B256::repeat_byte(0x01));
        assert_eq!(response.auxiliary_hashes(), vec![B256::repeat_byte(0x02)]);

        let settlement = response.wait(None).await.unwrap();
        assert_eq!(settlement.amount, MonetaryAmount::new(42, 18));
        assert_eq!(settlement.primary_receipt.tx_hash, B256::repeat_byte(0x01));
        assert_eq!(settlement.auxiliary_receipts.len(), 1);
        assert_eq!(
            settlement.auxiliary_receipts[0].tx_hash,
            B256::repeat_byte(0x02)
        );
    }

    #[tokio::test]
    async fn test_wait_ignores_events_in_auxiliary_receipts() {
        let primary = MockPending::mined(0x01, vec![unrelated_log()]);
        let approve = MockPending::mined(0x02, vec![mint_log(lib(), user(), 42)]);

        let settlement = TransactionResponse::new(
            Box::new(primary),
            vec![Box::new(approve)],
            mint_extraction(),
        )
        .wait(None)
        .await
        .unwrap();
        assert_eq!(settlement.amount, MonetaryAmount::zero(18));
    }

    #[tokio::test]
    async fn test_wait_primary_revert_fails_settlement() {
        let primary = MockPending::failing(0x01, revert());
        let approve = MockPending::mined(0x02, vec![]);

        let err = TransactionResponse::new(
            Box::new(primary),
            vec![Box::new(approve)],
            mint_extraction(),
        )
        .wait(None)
        .await
        .unwrap_err();
        assert_eq!(err, revert());
    }

    #[tokio::test]
    async fn test_wait_auxiliary_failure_fails_settlement() {
        let primary = MockPending::mined(0x01, vec![mint_log(lib(), user(), 42)]);
        let first = MockPending::mined(0x02, vec![]);
        let second = MockPending::failing(0x03, LedgerError::Timeout { seconds: 600 });

        let err = TransactionResponse::new(
            Box::new(primary),
            vec![Box::new(first), Box::new(second)],
            mint_extraction(),
        )
        .wait(Some(2))
        .await
        .unwrap_err();
        assert_eq!(err, LedgerError::Timeout { seconds: 600 });
    }

    #[tokio::test]
    async fn test_wait_passes_confirmations_to_every_transaction() {
        let primary = MockPending::mined(0x01, vec![]);
        let approve = MockPending::mined(0x02, vec![]);
        let primary_seen = primary.seen.clone();
        let approve_seen = approve.seen.clone();

        TransactionResponse::new(
            Box::new(primary),
            vec![Box::new(approve)],
            mint_extraction(),
        )
        .wait(Some(3))
        .await
        .unwrap();

        assert_eq!(*primary_seen.lock().unwrap(), vec![Some(3)]);
        assert_eq!(*approve_seen.lock().unwrap(), vec![Some(3)]);
    }

    #[tokio::test]
    async fn test_wait_without_auxiliaries() {
        let primary = MockPending::mined(0x01, vec![mint_log(lib(), user(), 7)]);
        let settlement = TransactionResponse::new(Box::new(primary), vec![], mint_extraction())
            .wait(None)
            .await
            .unwrap();
        assert_eq!(settlement.amount, MonetaryAmount::new(7, 18));
        assert!(settlement.auxiliary_receipts.is_empty());
    }
}
