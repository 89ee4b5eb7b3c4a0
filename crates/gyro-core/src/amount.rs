//! Fixed-point monetary amounts
//!
//! A `MonetaryAmount` wraps a raw on-chain integer together with the number of
//! implied decimals of its currency. "Normalized" means the human scale
//! (for DAI, `n` means `n` DAI) while the raw value is scaled by
//! `10^decimals` (for DAI, `n * 10^18`).
//!
//! # Rounding
//!
//! Fractional inputs (normalized floats and fractional multipliers) are
//! scaled with ROUND_HALF_UP (ties away from zero) applied to the exact
//! decimal expansion of the float's shortest representation, so `0.15`
//! scales as `15/100`. The final division in [`MonetaryAmount::mul`]
//! truncates toward zero.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use bigdecimal::{BigDecimal, RoundingMode};
use num::{BigInt, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::conversions::{big_int_to_u256, u256_to_big_int};
use crate::AmountError;

/// Immutable fixed-point quantity scaled by `10^decimals`
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonetaryAmount {
    #[serde_as(as = "DisplayFromStr")]
    raw: BigInt,
    decimals: u32,
}

/// An amount argument that is either a bare raw integer or a typed amount.
///
/// A `Raw` value is assumed to already be expressed in the raw scale of
/// whatever it is compared or combined with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountInput {
    Raw(BigInt),
    Scaled(MonetaryAmount),
}

fn scale_factor(decimals: u32) -> BigInt {
    BigInt::from(10u8).pow(decimals)
}

fn decimal_from_f64(value: f64) -> Result<BigDecimal, AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NonFinite {
            value: value.to_string(),
        });
    }
    // `Display` for f64 is the shortest round-trip form without exponent
    let repr = value.to_string();
    BigDecimal::from_str(&repr).map_err(|_| AmountError::InvalidDecimal { value: repr })
}

/// `round_half_up(value * 10^decimals)` computed exactly
fn scale_half_up(value: &BigDecimal, decimals: u32) -> BigInt {
    let (digits, exponent) = value.as_bigint_and_exponent();
    let shifted = BigDecimal::new(digits, exponent - i64::from(decimals));
    let (rounded, _) = shifted
        .with_scale_round(0, RoundingMode::HalfUp)
        .into_bigint_and_exponent();
    rounded
}

impl MonetaryAmount {
    /// Creates an amount from a raw value (for DAI, `n * 10^18` means `n` DAI)
    pub fn new(raw: impl Into<BigInt>, decimals: u32) -> Self {
        Self {
            raw: raw.into(),
            decimals,
        }
    }

    pub fn zero(decimals: u32) -> Self {
        Self::new(BigInt::zero(), decimals)
    }

    /// Creates an amount from an ABI `uint256` raw value
    pub fn from_u256(raw: U256, decimals: u32) -> Self {
        Self::new(u256_to_big_int(&raw), decimals)
    }

    /// Creates an amount from an integer normalized value (for DAI, `n` means `n` DAI)
    pub fn from_normalized(value: impl Into<BigInt>, decimals: u32) -> Self {
        Self::new(value.into() * scale_factor(decimals), decimals)
    }

    /// Creates an amount from a possibly fractional normalized value.
    ///
    /// Digits beyond `decimals` are rounded half-up.
    pub fn from_normalized_f64(value: f64, decimals: u32) -> Result<Self, AmountError> {
        let value = decimal_from_f64(value)?;
        Ok(Self::new(scale_half_up(&value, decimals), decimals))
    }

    /// Creates an amount from a decimal string such as `"12.5"`, without
    /// going through floating point.
    pub fn from_normalized_str(value: &str, decimals: u32) -> Result<Self, AmountError> {
        let parsed = BigDecimal::from_str(value.trim()).map_err(|_| AmountError::InvalidDecimal {
            value: value.to_string(),
        })?;
        Ok(Self::new(scale_half_up(&parsed, decimals), decimals))
    }

    /// The raw, unscaled value
    pub fn raw(&self) -> &BigInt {
        &self.raw
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn into_raw(self) -> BigInt {
        self.raw
    }

    /// The raw value as an ABI `uint256`
    pub fn to_u256(&self) -> Result<U256, AmountError> {
        big_int_to_u256(&self.raw)
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Compares the raw value with `other`.
    ///
    /// Fails when `other` is a typed amount with a different number of
    /// decimals. A bare integer is compared as-is against the raw value.
    pub fn compare(&self, other: impl Into<AmountInput>) -> Result<Ordering, AmountError> {
        match other.into() {
            AmountInput::Scaled(other) => {
                if other.decimals != self.decimals {
                    return Err(AmountError::IncompatibleScale {
                        left: self.decimals,
                        right: other.decimals,
                    });
                }
                Ok(self.raw.cmp(&other.raw))
            }
            AmountInput::Raw(other) => Ok(self.raw.cmp(&other)),
        }
    }

    pub fn is_eq(&self, other: impl Into<AmountInput>) -> Result<bool, AmountError> {
        self.compare(other).map(Ordering::is_eq)
    }

    pub fn is_gt(&self, other: impl Into<AmountInput>) -> Result<bool, AmountError> {
        self.compare(other).map(Ordering::is_gt)
    }

    pub fn is_gte(&self, other: impl Into<AmountInput>) -> Result<bool, AmountError> {
        self.compare(other).map(Ordering::is_ge)
    }

    pub fn is_lt(&self, other: impl Into<AmountInput>) -> Result<bool, AmountError> {
        self.compare(other).map(Ordering::is_lt)
    }

    pub fn is_lte(&self, other: impl Into<AmountInput>) -> Result<bool, AmountError> {
        self.compare(other).map(Ordering::is_le)
    }

    /// Exact multiplication by an integer
    #[must_use]
    pub fn mul_integer(&self, factor: impl Into<BigInt>) -> Self {
        Self::new(&self.raw * factor.into(), self.decimals)
    }

    /// Multiplies by a real-valued factor.
    ///
    /// Integral factors are exact. A fractional factor is first scaled to
    /// `round_half_up(factor * 10^decimals)`, then the product is divided by
    /// `10^decimals` truncating toward zero, which drops sub-unit precision.
    pub fn mul(&self, factor: f64) -> Result<Self, AmountError> {
        let factor = decimal_from_f64(factor)?;
        if factor.is_integer() {
            let (integral, _) = factor.with_scale(0).into_bigint_and_exponent();
            return Ok(self.mul_integer(integral));
        }
        let scaled_factor = scale_half_up(&factor, self.decimals);
        let raw = &self.raw * scaled_factor / scale_factor(self.decimals);
        Ok(Self::new(raw, self.decimals))
    }

    /// Amount after dividing by the decimal scale, truncated toward zero.
    /// Meant for display only.
    pub fn normalized_value(&self) -> BigInt {
        &self.raw / scale_factor(self.decimals)
    }

    /// Normalized value as a machine integer; fails outside the `i64` range
    pub fn to_normalized_number(&self) -> Result<i64, AmountError> {
        let normalized = self.normalized_value();
        normalized.to_i64().ok_or_else(|| AmountError::Overflow {
            value: normalized.to_string(),
        })
    }

    pub fn to_normalized_string(&self) -> String {
        self.normalized_value().to_string()
    }

    /// Exact human-readable representation, e.g. `1000.000` for
    /// `MonetaryAmount::new(1_000_000, 3)`
    pub fn to_decimal_string(&self) -> String {
        let digits = self.raw.abs().to_string();
        let sign = if self.raw.is_negative() { "-" } else { "" };
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return format!("{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        format!("{sign}{int_part}.{frac_part}")
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl AmountInput {
    pub fn raw(&self) -> &BigInt {
        match self {
            Self::Raw(raw) => raw,
            Self::Scaled(amount) => amount.raw(),
        }
    }

    pub fn into_raw(self) -> BigInt {
        match self {
            Self::Raw(raw) => raw,
            Self::Scaled(amount) => amount.into_raw(),
        }
    }

    pub fn to_u256(&self) -> Result<U256, AmountError> {
        big_int_to_u256(self.raw())
    }
}

impl From<MonetaryAmount> for AmountInput {
    fn from(amount: MonetaryAmount) -> Self {
        Self::Scaled(amount)
    }
}

impl From<&MonetaryAmount> for AmountInput {
    fn from(amount: &MonetaryAmount) -> Self {
        Self::Scaled(amount.clone())
    }
}

impl From<BigInt> for AmountInput {
    fn from(raw: BigInt) -> Self {
        Self::Raw(raw)
    }
}

impl From<&BigInt> for AmountInput {
    fn from(raw: &BigInt) -> Self {
        Self::Raw(raw.clone())
    }
}

impl From<U256> for AmountInput {
    fn from(raw: U256) -> Self {
        Self::Raw(u256_to_big_int(&raw))
    }
}

macro_rules! raw_amount_from_primitive {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AmountInput {
                fn from(raw: $ty) -> Self {
                    Self::Raw(BigInt::from(raw))
                }
            }
        )*
    };
}

raw_amount_from_primitive!(i32, i64, i128, u32, u64, u128);
