//! Gyro protocol commands

use alloy::primitives::{Address, TxHash};
use gyro::{Gyro, MintResult, RedeemResult};
use gyro_core::constants::DECIMALS;
use gyro_core::{MonetaryAmount, Reserve, Token};
use serde::Serialize;

use super::{print_json, AmountView};
use crate::cli::{Command, SettleArgs};

#[derive(Debug, Serialize)]
struct BalanceOutput {
    account: Address,
    token: Option<Address>,
    balance: AmountView,
}

#[derive(Debug, Serialize)]
struct EstimateOutput {
    estimate: AmountView,
}

#[derive(Debug, Serialize)]
struct ReserveOutput<'a> {
    #[serde(flatten)]
    reserve: &'a Reserve,
    value: String,
}

#[derive(Debug, Serialize)]
struct SettledOutput<R: Serialize> {
    tx_hash: TxHash,
    approve_hashes: Vec<TxHash>,
    amount: AmountView,
    result: R,
}

#[derive(Debug, Serialize)]
struct ArbitrageOutput {
    first_tx: TxHash,
    second_tx: TxHash,
    verified: bool,
}

pub async fn execute(gyro: &Gyro, command: Command, approve_future: bool) -> anyhow::Result<()> {
    match command {
        Command::Status => anyhow::bail!("status is a node command"),
        Command::Balance { token, owner } => balance(gyro, token, owner).await,
        Command::SupportedTokens => supported_tokens(gyro).await,
        Command::Reserves => reserves(gyro).await,
        Command::EstimateMint { inputs } => {
            let estimate = gyro.estimate_minted(&inputs).await?;
            print_json(&EstimateOutput {
                estimate: AmountView::from(&estimate),
            })
        }
        Command::EstimateRedeem { outputs } => {
            let estimate = gyro.estimate_redeemed(&outputs).await?;
            print_json(&EstimateOutput {
                estimate: AmountView::from(&estimate),
            })
        }
        Command::Mint {
            inputs,
            min_minted,
            settle,
        } => {
            let min_minted = min_minted.map(|raw| MonetaryAmount::from_u256(raw, DECIMALS));
            let approve_future = settle_approve_future(approve_future, &settle);
            let response = gyro.mint(&inputs, min_minted, approve_future).await?;
            let (tx_hash, approve_hashes) = (response.tx_hash(), response.approve_hashes());
            tracing::info!(%tx_hash, approvals = approve_hashes.len(), "Waiting for mint");

            let result: MintResult = response.wait(settle.confirmations).await?;
            print_json(&SettledOutput {
                tx_hash,
                approve_hashes,
                amount: AmountView::from(&result.amount_minted),
                result,
            })
        }
        Command::Redeem {
            outputs,
            max_redeemed,
            settle,
        } => {
            let max_redeemed = max_redeemed.map(|raw| MonetaryAmount::from_u256(raw, DECIMALS));
            let approve_future = settle_approve_future(approve_future, &settle);
            let response = gyro.redeem(&outputs, max_redeemed, approve_future).await?;
            let tx_hash = response.tx_hash();
            let approve_hashes: Vec<_> = response.approve_hash().into_iter().collect();
            tracing::info!(%tx_hash, approvals = approve_hashes.len(), "Waiting for redeem");

            let result: RedeemResult = response.wait(settle.confirmations).await?;
            print_json(&SettledOutput {
                tx_hash,
                approve_hashes,
                amount: AmountView::from(&result.amount_redeemed),
                result,
            })
        }
        Command::VerifyArbitrage {
            first_tx,
            second_tx,
        } => {
            let verified = gyro.verify_arbitrage(first_tx, second_tx).await?;
            print_json(&ArbitrageOutput {
                first_tx,
                second_tx,
                verified,
            })
        }
    }
}

async fn balance(gyro: &Gyro, token: Option<Address>, owner: Option<Address>) -> anyhow::Result<()> {
    let balance = match (token, owner) {
        (None, None) => gyro.balance().await?,
        (None, Some(owner)) => gyro.token_balance(gyro.fund_address(), Some(owner)).await?,
        (Some(token), owner) => gyro.token_balance(token, owner).await?,
    };
    print_json(&BalanceOutput {
        account: owner.unwrap_or_else(|| gyro.address()),
        token,
        balance: AmountView::from(&balance),
    })
}

async fn supported_tokens(gyro: &Gyro) -> anyhow::Result<()> {
    let tokens: Vec<Token> = gyro.supported_tokens().await?;
    print_json(&tokens)
}

async fn reserves(gyro: &Gyro) -> anyhow::Result<()> {
    let reserves = gyro.reserve_values().await?;
    let output: Vec<_> = reserves
        .iter()
        .map(|reserve| ReserveOutput {
            reserve,
            value: reserve.amount.to_decimal_string(),
        })
        .collect();
    print_json(&output)
}

/// `--exact-approval` overrides a configured future approval
fn settle_approve_future(configured: bool, settle: &SettleArgs) -> bool {
    configured && !settle.exact_approval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_approval_overrides_config() {
        let exact = SettleArgs {
            exact_approval: true,
            confirmations: None,
        };
        let default = SettleArgs {
            exact_approval: false,
            confirmations: None,
        };

        assert!(settle_approve_future(true, &default));
        assert!(!settle_approve_future(true, &exact));
        assert!(!settle_approve_future(false, &default));
    }
}
