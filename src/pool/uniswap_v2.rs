//! Uniswap V2 pair 查询
//!
//! Read-only calls against a pair contract: `getReserves()`, `token0()` and
//! `token1()`. Return payloads are decoded into typed values here, so nothing
//! past this module handles raw ABI data.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, sol};
use num_bigint::BigUint;
use std::future::Future;
use std::time::Duration;

use crate::common::LedgerClient;
use crate::error::{EstimateError, LedgerError, LedgerOp};

sol! {
    /// Read-only subset of the Uniswap V2 pair interface.
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }
}

/// Raw reserves in canonical (token0, token1) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservePair {
    pub reserve0: BigUint,
    pub reserve1: BigUint,
    /// Decoded for completeness; quotes do not depend on it.
    pub block_timestamp_last: u32,
}

/// The pair's fixed token ordering. `token1` is only present when it was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalOrdering {
    pub token0: Address,
    pub token1: Option<Address>,
}

/// Everything read from a pair for one estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairState {
    pub reserves: ReservePair,
    pub ordering: CanonicalOrdering,
}

impl PairState {
    /// Number of remote reads that produced this state.
    pub fn ledger_calls(&self) -> usize {
        if self.ordering.token1.is_some() { 3 } else { 2 }
    }
}

/// Runs a ledger read under an optional deadline.
async fn with_deadline<F>(deadline: Option<Duration>, call: F) -> Result<Bytes, LedgerError>
where
    F: Future<Output = Result<Bytes, LedgerError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| LedgerError::Timeout(limit))?,
        None => call.await,
    }
}

async fn call_pair<C: SolCall>(
    rpc: &dyn LedgerClient,
    pool_address: Address,
    call: C,
    op: LedgerOp,
    deadline: Option<Duration>,
) -> Result<C::Return, EstimateError> {
    let calldata = Bytes::from(call.abi_encode());
    let payload = with_deadline(deadline, rpc.call(pool_address, calldata))
        .await
        .map_err(EstimateError::rpc(op))?;
    // Validating decode: words with bits above the declared width are rejected.
    C::abi_decode_returns_validate(&payload).map_err(EstimateError::decode(op))
}

/// Fetches `getReserves()` from the pair.
pub async fn fetch_reserves(
    rpc: &dyn LedgerClient,
    pool_address: Address,
    deadline: Option<Duration>,
) -> Result<ReservePair, EstimateError> {
    let ret = call_pair(
        rpc,
        pool_address,
        IUniswapV2Pair::getReservesCall {},
        LedgerOp::GetReserves,
        deadline,
    )
    .await?;
    Ok(ReservePair {
        reserve0: BigUint::from_bytes_be(&ret.reserve0.to_be_bytes_vec()),
        reserve1: BigUint::from_bytes_be(&ret.reserve1.to_be_bytes_vec()),
        block_timestamp_last: ret.blockTimestampLast,
    })
}

/// Fetches `token0()` from the pair.
pub async fn fetch_token0(
    rpc: &dyn LedgerClient,
    pool_address: Address,
    deadline: Option<Duration>,
) -> Result<Address, EstimateError> {
    call_pair(rpc, pool_address, IUniswapV2Pair::token0Call {}, LedgerOp::Token0, deadline).await
}

/// Fetches `token1()` from the pair.
pub async fn fetch_token1(
    rpc: &dyn LedgerClient,
    pool_address: Address,
    deadline: Option<Duration>,
) -> Result<Address, EstimateError> {
    call_pair(rpc, pool_address, IUniswapV2Pair::token1Call {}, LedgerOp::Token1, deadline).await
}

/// Fetches reserves and token ordering concurrently.
///
/// `with_token1` adds the `token1()` read. The first failing read aborts the rest.
pub async fn fetch_pair_state(
    rpc: &dyn LedgerClient,
    pool_address: Address,
    with_token1: bool,
    deadline: Option<Duration>,
) -> Result<PairState, EstimateError> {
    let token1 = async {
        if with_token1 {
            fetch_token1(rpc, pool_address, deadline).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (reserves, token0, token1) = tokio::try_join!(
        fetch_reserves(rpc, pool_address, deadline),
        fetch_token0(rpc, pool_address, deadline),
        token1,
    )?;
    Ok(PairState { reserves, ordering: CanonicalOrdering { token0, token1 } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn word(bytes: &[u8]) -> [u8; 32] {
        let mut w = [0u8; 32];
        w[32 - bytes.len()..].copy_from_slice(bytes);
        w
    }

    fn reserves_payload(r0: u128, r1: u128, ts: u32) -> Bytes {
        let mut out = Vec::with_capacity(96);
        out.extend_from_slice(&word(&r0.to_be_bytes()));
        out.extend_from_slice(&word(&r1.to_be_bytes()));
        out.extend_from_slice(&word(&ts.to_be_bytes()));
        Bytes::from(out)
    }

    /// Answers by selector; counts calls.
    struct PairStub {
        reserves: Bytes,
        token0: Address,
        token1: Address,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LedgerClient for PairStub {
        async fn call(&self, _: Address, calldata: Bytes) -> Result<Bytes, LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let selector: [u8; 4] = calldata[..4].try_into().unwrap();
            if selector == IUniswapV2Pair::getReservesCall::SELECTOR {
                Ok(self.reserves.clone())
            } else if selector == IUniswapV2Pair::token0Call::SELECTOR {
                Ok(Bytes::from(word(self.token0.as_slice()).to_vec()))
            } else if selector == IUniswapV2Pair::token1Call::SELECTOR {
                Ok(Bytes::from(word(self.token1.as_slice()).to_vec()))
            } else {
                Err(LedgerError::Node { code: 3, message: "execution reverted".into() })
            }
        }
    }

    fn stub(reserves: Bytes) -> PairStub {
        PairStub {
            reserves,
            token0: Address::repeat_byte(0x0a),
            token1: Address::repeat_byte(0x0b),
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_selectors() {
        assert_eq!(IUniswapV2Pair::getReservesCall::SELECTOR, [0x09, 0x02, 0xf1, 0xac]);
        assert_eq!(IUniswapV2Pair::token0Call::SELECTOR, [0x0d, 0xfe, 0x16, 0x81]);
        assert_eq!(IUniswapV2Pair::token1Call::SELECTOR, [0xd2, 0x12, 0x20, 0xa7]);
        assert_eq!(IUniswapV2Pair::getReservesCall {}.abi_encode(), vec![0x09, 0x02, 0xf1, 0xac]);
    }

    #[tokio::test]
    async fn test_fetch_reserves_decodes_tuple() {
        let max112 = (1u128 << 112) - 1;
        let rpc = stub(reserves_payload(max112, 42, 1_700_000_000));
        let reserves = fetch_reserves(&rpc, Address::ZERO, None).await.unwrap();
        assert_eq!(reserves.reserve0, BigUint::from(max112));
        assert_eq!(reserves.reserve1, BigUint::from(42u32));
        assert_eq!(reserves.block_timestamp_last, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_truncated_reserves_is_decode_failure() {
        let full = reserves_payload(1, 2, 3);
        let rpc = stub(Bytes::from(full[..40].to_vec()));
        let err = fetch_reserves(&rpc, Address::ZERO, None).await.unwrap_err();
        assert!(matches!(err, EstimateError::DecodeFailure { op: LedgerOp::GetReserves, .. }));
    }

    #[tokio::test]
    async fn test_out_of_range_reserve_is_decode_failure() {
        // Bit 248 set in reserve0's word; the low byte alone would read as 5.
        let mut raw = reserves_payload(5, 2, 3).to_vec();
        raw[0] = 0x01;
        let rpc = stub(Bytes::from(raw));
        let err = fetch_reserves(&rpc, Address::ZERO, None).await.unwrap_err();
        assert!(matches!(err, EstimateError::DecodeFailure { op: LedgerOp::GetReserves, .. }));

        // Bit 112 set in reserve1's word, one past the uint112 range.
        let mut raw = reserves_payload(5, 2, 3).to_vec();
        raw[32 + 17] = 0x01;
        let rpc = stub(Bytes::from(raw));
        let err = fetch_reserves(&rpc, Address::ZERO, None).await.unwrap_err();
        assert!(matches!(err, EstimateError::DecodeFailure { op: LedgerOp::GetReserves, .. }));
    }

    /// Answers every call with the same payload.
    struct RawLedger(Bytes);

    #[async_trait]
    impl LedgerClient for RawLedger {
        async fn call(&self, _: Address, _: Bytes) -> Result<Bytes, LedgerError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_dirty_address_word_is_decode_failure() {
        let mut raw = word(Address::repeat_byte(0x0a).as_slice());
        raw[0] = 0xff;
        let err = fetch_token0(&RawLedger(Bytes::from(raw.to_vec())), Address::ZERO, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::DecodeFailure { op: LedgerOp::Token0, .. }));

        let clean = word(Address::repeat_byte(0x0a).as_slice());
        let token = fetch_token0(&RawLedger(Bytes::from(clean.to_vec())), Address::ZERO, None)
            .await
            .unwrap();
        assert_eq!(token, Address::repeat_byte(0x0a));
    }

    #[tokio::test]
    async fn test_empty_payload_is_decode_failure() {
        // A call to an address without code returns `0x`.
        let rpc = stub(Bytes::new());
        let err = fetch_reserves(&rpc, Address::ZERO, None).await.unwrap_err();
        assert!(matches!(err, EstimateError::DecodeFailure { .. }));
    }

    #[tokio::test]
    async fn test_fetch_pair_state_call_counts() {
        let rpc = stub(reserves_payload(10, 20, 0));
        let state = fetch_pair_state(&rpc, Address::ZERO, false, None).await.unwrap();
        assert_eq!(state.ordering, CanonicalOrdering { token0: rpc.token0, token1: None });
        assert_eq!(state.ledger_calls(), 2);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 2);

        let rpc = stub(reserves_payload(10, 20, 0));
        let state = fetch_pair_state(&rpc, Address::ZERO, true, None).await.unwrap();
        assert_eq!(state.ordering.token1, Some(rpc.token1));
        assert_eq!(state.ledger_calls(), 3);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 3);
    }

    struct SlowLedger;

    #[async_trait]
    impl LedgerClient for SlowLedger {
        async fn call(&self, _: Address, _: Bytes) -> Result<Bytes, LedgerError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Bytes::new())
        }
    }

    #[tokio::test]
    async fn test_deadline_surfaces_timeout() {
        let err = fetch_token0(&SlowLedger, Address::ZERO, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::RpcFailure { op: LedgerOp::Token0, source: LedgerError::Timeout(_) }
        ));
    }
}
