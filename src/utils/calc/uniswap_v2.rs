//! Uniswap V2 constant-product swap math
//!
//! All arithmetic is arbitrary precision: a 112-bit reserve times a fee-scaled
//! input easily exceeds 256 bits, and the result must match the pair contract's
//! integer division bit for bit.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::constants::{FEE_DENOMINATOR, FEE_NUMERATOR};
use crate::error::EstimateError;

/// Output amount of an exact-in swap.
///
/// ```text
/// amount_in_with_fee = amount_in * 997
/// amount_out = amount_in_with_fee * reserve_out / (reserve_in * 1000 + amount_in_with_fee)
/// ```
///
/// Division floors. A pool with either reserve at zero is rejected with
/// [`EstimateError::ZeroReserves`].
pub fn get_amount_out(
    amount_in: &BigUint,
    reserve_in: &BigUint,
    reserve_out: &BigUint,
) -> Result<BigUint, EstimateError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(EstimateError::ZeroReserves {
            reserve_in: reserve_in.clone(),
            reserve_out: reserve_out.clone(),
        });
    }
    if amount_in.is_zero() {
        return Ok(BigUint::zero());
    }

    let amount_in_with_fee = amount_in * FEE_NUMERATOR;
    let numerator = &amount_in_with_fee * reserve_out;
    let denominator = reserve_in * FEE_DENOMINATOR + &amount_in_with_fee;

    Ok(numerator / denominator)
}
