//! Command-line arguments

use std::path::PathBuf;

use alloy::primitives::{Address, B256, U256};
use clap::{Args, Parser, Subcommand};
use gyro_core::TokenWithAmount;

#[derive(Debug, Parser)]
#[command(name = "gyro", version, about = "Mint and redeem Gyro from the command line")]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "GYRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Account to act as (defaults to the signer or the node's first account)
    #[arg(long, global = true, value_parser = parse_address)]
    pub account: Option<Address>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show node status
    Status,

    /// Gyro balance, or the balance of another token with --token
    Balance {
        #[arg(long, value_parser = parse_address)]
        token: Option<Address>,

        /// Holder to query instead of the current account
        #[arg(long, value_parser = parse_address)]
        owner: Option<Address>,
    },

    /// Tokens accepted for minting, with their metadata
    SupportedTokens,

    /// Value of each reserve pool
    Reserves,

    /// Expected Gyro minted for TOKEN=AMOUNT inputs
    EstimateMint {
        #[arg(required = true, value_parser = parse_token_amount)]
        inputs: Vec<TokenWithAmount>,
    },

    /// Expected Gyro redeemed for TOKEN=AMOUNT outputs
    EstimateRedeem {
        #[arg(required = true, value_parser = parse_token_amount)]
        outputs: Vec<TokenWithAmount>,
    },

    /// Mint Gyro from TOKEN=AMOUNT inputs
    Mint {
        #[arg(required = true, value_parser = parse_token_amount)]
        inputs: Vec<TokenWithAmount>,

        /// Minimum raw amount of Gyro to mint
        #[arg(long, value_parser = parse_raw_amount)]
        min_minted: Option<U256>,

        #[command(flatten)]
        settle: SettleArgs,
    },

    /// Redeem Gyro into TOKEN=AMOUNT outputs
    Redeem {
        #[arg(required = true, value_parser = parse_token_amount)]
        outputs: Vec<TokenWithAmount>,

        /// Maximum raw amount of Gyro to redeem
        #[arg(long, value_parser = parse_raw_amount)]
        max_redeemed: Option<U256>,

        #[command(flatten)]
        settle: SettleArgs,
    },

    /// Check that the second transaction moved more USDC than the first
    VerifyArbitrage {
        #[arg(value_parser = parse_tx_hash)]
        first_tx: B256,

        #[arg(value_parser = parse_tx_hash)]
        second_tx: B256,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SettleArgs {
    /// Approve exactly the required amounts instead of a large allowance
    #[arg(long)]
    pub exact_approval: bool,

    /// Confirmations to wait for
    #[arg(long)]
    pub confirmations: Option<u64>,
}

fn parse_address(value: &str) -> Result<Address, String> {
    value
        .trim()
        .parse()
        .map_err(|e| format!("invalid address `{}`: {}", value, e))
}

fn parse_tx_hash(value: &str) -> Result<B256, String> {
    value
        .trim()
        .parse()
        .map_err(|e| format!("invalid transaction hash `{}`: {}", value, e))
}

/// Raw integer amount, in the token's smallest unit
pub fn parse_raw_amount(value: &str) -> Result<U256, String> {
    U256::from_str_radix(value.trim(), 10)
        .map_err(|e| format!("invalid amount `{}`: {}", value, e))
}

/// `TOKEN=AMOUNT` with a raw integer amount
pub fn parse_token_amount(value: &str) -> Result<TokenWithAmount, String> {
    let (token, amount) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TOKEN=AMOUNT, got `{}`", value))?;
    Ok(TokenWithAmount::new(
        parse_address(token)?,
        parse_raw_amount(amount)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const DAI: &str = "0x1111111111111111111111111111111111111111";
    const WETH: &str = "0x2222222222222222222222222222222222222222";

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_token_amount() {
        let input = parse_token_amount(&format!("{}=2500", DAI)).unwrap();
        assert_eq!(input.token, Address::repeat_byte(0x11));
        assert_eq!(input.amount.to_u256().unwrap(), U256::from(2500u64));

        assert!(parse_token_amount(DAI).is_err());
        assert!(parse_token_amount("0x12=1").is_err());
        assert!(parse_token_amount(&format!("{}=1.5", DAI)).is_err());
    }

    #[test]
    fn test_parse_mint() {
        let cli = Cli::try_parse_from([
            "gyro",
            "mint",
            &format!("{}=2500", DAI),
            &format!("{}=2", WETH),
            "--min-minted",
            "100",
            "--exact-approval",
            "--confirmations",
            "2",
        ])
        .unwrap();

        match cli.command {
            Command::Mint {
                inputs,
                min_minted,
                settle,
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(inputs[1].token, Address::repeat_byte(0x22));
                assert_eq!(min_minted, Some(U256::from(100u64)));
                assert!(settle.exact_approval);
                assert_eq!(settle.confirmations, Some(2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mint_requires_inputs() {
        assert!(Cli::try_parse_from(["gyro", "mint"]).is_err());
    }

    #[test]
    fn test_global_account() {
        let cli = Cli::try_parse_from(["gyro", "balance", "--account", WETH]).unwrap();
        assert_eq!(cli.account, Some(Address::repeat_byte(0x22)));
        assert!(matches!(
            cli.command,
            Command::Balance {
                token: None,
                owner: None
            }
        ));
    }
}
