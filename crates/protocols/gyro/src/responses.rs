//! Mint and redeem transaction responses
//!
//! Both wrap a [`TransactionResponse`]: the mint or redeem call is the
//! primary transaction and the approvals submitted before it are the
//! auxiliaries. Settling yields the amount reported by the primary receipt.

use alloy::primitives::TxHash;
use evm_tx::{
    EventExtraction, InterfaceSet, PendingTransaction, Settlement, TransactionResponse, TxReceipt,
};
use gyro_core::constants::DECIMALS;
use gyro_core::{LedgerError, MonetaryAmount};
use serde::Serialize;

use crate::constants::{AMOUNT_ARG, MINT_EVENT, REDEEM_EVENT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintResult {
    /// Zero when the receipt carries no `Mint` event
    pub amount_minted: MonetaryAmount,
    pub mint_receipt: TxReceipt,
    pub approve_receipts: Vec<TxReceipt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedeemResult {
    /// Zero when the receipt carries no `Redeem` event
    pub amount_redeemed: MonetaryAmount,
    pub redeem_receipt: TxReceipt,
    pub approve_receipts: Vec<TxReceipt>,
}

#[derive(Debug)]
pub struct MintTransactionResponse {
    inner: TransactionResponse,
}

impl MintTransactionResponse {
    pub fn new(
        tx: Box<dyn PendingTransaction>,
        approve_txs: Vec<Box<dyn PendingTransaction>>,
        interfaces: InterfaceSet,
    ) -> Self {
        let extraction = EventExtraction::new(MINT_EVENT, AMOUNT_ARG, DECIMALS, interfaces);
        Self {
            inner: TransactionResponse::new(tx, approve_txs, extraction),
        }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.inner.tx_hash()
    }

    pub fn approve_hashes(&self) -> Vec<TxHash> {
        self.inner.auxiliary_hashes()
    }

    /// Wait for the mint and its approvals, then read the minted amount
    pub async fn wait(self, confirmations: Option<u64>) -> Result<MintResult, LedgerError> {
        let Settlement {
            amount,
            primary_receipt,
            auxiliary_receipts,
        } = self.inner.wait(confirmations).await?;

        Ok(MintResult {
            amount_minted: amount,
            mint_receipt: primary_receipt,
            approve_receipts: auxiliary_receipts,
        })
    }
}

#[derive(Debug)]
pub struct RedeemTransactionResponse {
    inner: TransactionResponse,
}

impl RedeemTransactionResponse {
    pub fn new(
        tx: Box<dyn PendingTransaction>,
        approve_tx: Option<Box<dyn PendingTransaction>>,
        interfaces: InterfaceSet,
    ) -> Self {
        let extraction = EventExtraction::new(REDEEM_EVENT, AMOUNT_ARG, DECIMALS, interfaces);
        Self {
            inner: TransactionResponse::new(tx, approve_tx.into_iter().collect(), extraction),
        }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.inner.tx_hash()
    }

    pub fn approve_hash(&self) -> Option<TxHash> {
        self.inner.auxiliary_hashes().into_iter().next()
    }

    /// Wait for the redeem and its approval, then read the redeemed amount
    pub async fn wait(self, confirmations: Option<u64>) -> Result<RedeemResult, LedgerError> {
        let Settlement {
            amount,
            primary_receipt,
            auxiliary_receipts,
        } = self.inner.wait(confirmations).await?;

        Ok(RedeemResult {
            amount_redeemed: amount,
            redeem_receipt: primary_receipt,
            approve_receipts: auxiliary_receipts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::GyroInterfaces;
    use alloy::primitives::{keccak256, Address, Bytes, Log, B256, U256};
    use async_trait::async_trait;

    struct MinedTx {
        receipt: Result<TxReceipt, LedgerError>,
    }

    impl MinedTx {
        fn boxed(byte: u8, logs: Vec<Log>) -> Box<dyn PendingTransaction> {
            let hash = B256::repeat_byte(byte);
            Box::new(Self {
                receipt: Ok(TxReceipt::new(hash, Some(1), true, logs)),
            })
        }

        fn reverted() -> Box<dyn PendingTransaction> {
            Box::new(Self {
                receipt: Err(LedgerError::Revert {
                    reason: "minimum not reached".to_string(),
                }),
            })
        }
    }

    #[async_trait]
    impl PendingTransaction for MinedTx {
        fn tx_hash(&self) -> TxHash {
            match &self.receipt {
                Ok(receipt) => receipt.tx_hash,
                Err(_) => TxHash::ZERO,
            }
        }

        async fn await_confirmation(
            &self,
            _confirmations: Option<u64>,
        ) -> Result<TxReceipt, LedgerError> {
            self.receipt.clone()
        }
    }

    fn word(value: u64) -> B256 {
        B256::from(U256::from(value).to_be_bytes::<32>())
    }

    fn user() -> Address {
        Address::repeat_byte(0x01)
    }

    /// Emitted by the library: minter and amount both indexed
    fn lib_mint_log(amount: u64) -> Log {
        Log::new_unchecked(
            Address::repeat_byte(0x10),
            vec![keccak256("Mint(address,uint256)"), user().into_word(), word(amount)],
            Bytes::new(),
        )
    }

    /// Emitted by the fund: only the amount indexed
    fn fund_mint_log(amount: u64) -> Log {
        Log::new_unchecked(
            Address::repeat_byte(0x20),
            vec![keccak256("Mint(address,uint256)"), word(amount)],
            Bytes::from(user().into_word().to_vec()),
        )
    }

    fn lib_redeem_log(amount: u64) -> Log {
        Log::new_unchecked(
            Address::repeat_byte(0x10),
            vec![keccak256("Redeem(address,uint256)"), user().into_word(), word(amount)],
            Bytes::new(),
        )
    }

    fn transfer_log(value: u64) -> Log {
        Log::new_unchecked(
            Address::repeat_byte(0xaa),
            vec![
                keccak256("Transfer(address,address,uint256)"),
                user().into_word(),
                Address::repeat_byte(0x20).into_word(),
            ],
            Bytes::from(word(value).to_vec()),
        )
    }

    #[tokio::test]
    async fn test_mint_reads_first_mint_event() {
        let interfaces = GyroInterfaces::load().unwrap();
        let tx = MinedTx::boxed(
            0x01,
            vec![transfer_log(2500), fund_mint_log(99), lib_mint_log(100)],
        );
        let approvals = vec![MinedTx::boxed(0x02, vec![]), MinedTx::boxed(0x03, vec![])];

        let response = MintTransactionResponse::new(tx, approvals, interfaces.mint);
        assert_eq!(
            response.approve_hashes(),
            vec![B256::repeat_byte(0x02), B256::repeat_byte(0x03)]
        );

        let result = response.wait(None).await.unwrap();
        // The fund log comes first in the receipt and decodes under the
        // fund interface after the library interface rejects it.
        assert_eq!(result.amount_minted, MonetaryAmount::new(99, 18));
        assert_eq!(result.mint_receipt.tx_hash, B256::repeat_byte(0x01));
        assert_eq!(result.approve_receipts.len(), 2);
    }

    #[tokio::test]
    async fn test_mint_without_event_is_zero() {
        let interfaces = GyroInterfaces::load().unwrap();
        let tx = MinedTx::boxed(0x01, vec![transfer_log(1)]);

        let result = MintTransactionResponse::new(tx, vec![], interfaces.mint)
            .wait(Some(1))
            .await
            .unwrap();
        assert!(result.amount_minted.is_zero());
        assert_eq!(result.amount_minted.decimals(), 18);
    }

    #[tokio::test]
    async fn test_mint_revert_propagates() {
        let interfaces = GyroInterfaces::load().unwrap();
        let approvals = vec![MinedTx::boxed(0x02, vec![])];

        let err = MintTransactionResponse::new(MinedTx::reverted(), approvals, interfaces.mint)
            .wait(None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "revert");
    }

    #[tokio::test]
    async fn test_redeem_reads_redeem_event() {
        let interfaces = GyroInterfaces::load().unwrap();
        let tx = MinedTx::boxed(0x04, vec![lib_mint_log(5), lib_redeem_log(40)]);

        let response =
            RedeemTransactionResponse::new(tx, Some(MinedTx::boxed(0x05, vec![])), interfaces.redeem);
        assert_eq!(response.approve_hash(), Some(B256::repeat_byte(0x05)));

        let result = response.wait(None).await.unwrap();
        assert_eq!(result.amount_redeemed, MonetaryAmount::new(40, 18));
        assert_eq!(result.approve_receipts.len(), 1);
    }

    #[tokio::test]
    async fn test_redeem_without_approval() {
        let interfaces = GyroInterfaces::load().unwrap();
        let tx = MinedTx::boxed(0x04, vec![]);

        let response = RedeemTransactionResponse::new(tx, None, interfaces.redeem);
        assert_eq!(response.approve_hash(), None);

        let result = response.wait(None).await.unwrap();
        assert!(result.amount_redeemed.is_zero());
        assert!(result.approve_receipts.is_empty());
    }
}
