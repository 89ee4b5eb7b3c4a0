//! Conversions between ABI integers and arbitrary-precision integers

use alloy::primitives::U256;
use num::bigint::Sign;
use num::{BigInt, BigUint};

use crate::AmountError;

pub fn u256_to_big_uint(input: &U256) -> BigUint {
    BigUint::from_bytes_be(&input.to_be_bytes::<32>())
}

pub fn u256_to_big_int(input: &U256) -> BigInt {
    BigInt::from_biguint(Sign::Plus, u256_to_big_uint(input))
}

/// Narrow a signed big integer to `uint256`, rejecting negatives and values
/// wider than 32 bytes.
pub fn big_int_to_u256(input: &BigInt) -> Result<U256, AmountError> {
    let out_of_range = || AmountError::OutOfRange {
        value: input.to_string(),
    };
    if input.sign() == Sign::Minus {
        return Err(out_of_range());
    }
    let bytes = input.magnitude().to_bytes_be();
    if bytes.len() > 32 {
        return Err(out_of_range());
    }
    U256::try_from_be_slice(&bytes).ok_or_else(out_of_range)
}
