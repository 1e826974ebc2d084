//! Reserve 方向对齐
//!
//! Maps the caller's (src, dst) pair onto (reserve_in, reserve_out) using the
//! pair's canonical token ordering.

use alloy_primitives::Address;
use num_bigint::BigUint;

use super::uniswap_v2::{CanonicalOrdering, ReservePair};
use crate::common::ReconcilePolicy;
use crate::error::EstimateError;

/// Pool reserves oriented to the requested trade direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub reserve_in: BigUint,
    pub reserve_out: BigUint,
}

/// Orients `reserves` for a `src -> dst` swap.
///
/// Under [`ReconcilePolicy::Strict`] the ordering must carry `token1` and the pair
/// must be exactly `(token0, token1)` or `(token1, token0)`. Under
/// [`ReconcilePolicy::Token0Only`] only one side is checked against `token0`.
pub fn reconcile(
    reserves: &ReservePair,
    ordering: &CanonicalOrdering,
    src: Address,
    dst: Address,
    policy: ReconcilePolicy,
) -> Result<ReserveSnapshot, EstimateError> {
    let mismatch = || EstimateError::TokenMismatch {
        src,
        dst,
        token0: ordering.token0,
        token1: ordering.token1,
    };

    let zero_for_one = match policy {
        ReconcilePolicy::Strict => {
            let token1 = ordering.token1.ok_or_else(mismatch)?;
            if src == ordering.token0 && dst == token1 {
                true
            } else if src == token1 && dst == ordering.token0 {
                false
            } else {
                return Err(mismatch());
            }
        }
        ReconcilePolicy::Token0Only => {
            if ordering.token0 == src {
                true
            } else if ordering.token0 == dst {
                false
            } else {
                return Err(mismatch());
            }
        }
    };

    let (reserve_in, reserve_out) = if zero_for_one {
        (reserves.reserve0.clone(), reserves.reserve1.clone())
    } else {
        (reserves.reserve1.clone(), reserves.reserve0.clone())
    };
    Ok(ReserveSnapshot { reserve_in, reserve_out })
}
