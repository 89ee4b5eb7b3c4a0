//! Command handlers
//!
//! Every command prints a single JSON document on stdout.

pub mod gyro;
pub mod node;

use gyro_core::MonetaryAmount;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// An amount as printed: raw integer and human readable value
#[derive(Debug, Serialize)]
pub(crate) struct AmountView {
    pub raw: String,
    pub decimals: u32,
    pub value: String,
}

impl From<&MonetaryAmount> for AmountView {
    fn from(amount: &MonetaryAmount) -> Self {
        Self {
            raw: amount.raw().to_string(),
            decimals: amount.decimals(),
            value: amount.to_decimal_string(),
        }
    }
}
