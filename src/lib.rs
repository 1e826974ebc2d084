pub mod common;
pub mod constants;
pub mod error;
pub mod http_api;
pub mod pool;
pub mod utils;

use alloy_primitives::Address;
use num_bigint::BigUint;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{EstimatorConfig, HttpLedgerClient, LedgerClient, ReconcilePolicy};
use crate::constants::token_label;
use crate::error::{EstimateError, LedgerError};
use crate::pool::reconcile::reconcile;
use crate::pool::uniswap_v2::fetch_pair_state;
use crate::utils::calc::uniswap_v2::get_amount_out;
use crate::utils::parse::{parse_address, parse_amount};

pub use crate::utils::quote::SwapQuote;

/// Swap estimation engine for Uniswap V2 style pairs
///
/// Every estimate reads the pair fresh (reserves and token ordering, concurrently),
/// orients the reserves to the requested direction and applies the constant-product
/// formula with the 0.3% fee. Nothing is cached between calls, so one instance can
/// serve any number of concurrent requests.
#[derive(Clone)]
pub struct SwapEstimator {
    /// Ledger access, owned by the composition root.
    pub ledger: Arc<dyn LedgerClient>,
    /// How (src, dst) is matched against the pair's tokens.
    pub policy: ReconcilePolicy,
    /// Deadline applied to each ledger read.
    pub call_timeout: Option<Duration>,
}

impl SwapEstimator {
    /// Creates an estimator over an existing ledger client.
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger, policy: ReconcilePolicy::default(), call_timeout: None }
    }

    /// Creates an estimator backed by an HTTP JSON-RPC node as described by `config`.
    pub fn from_config(config: &EstimatorConfig) -> Result<Self, LedgerError> {
        let ledger = HttpLedgerClient::new(config.node_url.clone(), config.call_timeout)?;
        Ok(Self::new(Arc::new(ledger))
            .with_policy(config.reconcile_policy)
            .with_call_timeout(config.call_timeout))
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Estimates the output of swapping `amount_in` of `src` for `dst` in `pool`.
    ///
    /// # Errors
    /// - `RpcFailure` / `DecodeFailure` when a pair read fails, tagged with the read
    /// - `TokenMismatch` when the pair does not trade `src`/`dst`
    /// - `ZeroReserves` for an empty pair
    pub async fn estimate(
        &self,
        pool: Address,
        src: Address,
        dst: Address,
        amount_in: BigUint,
    ) -> Result<SwapQuote, EstimateError> {
        let state =
            fetch_pair_state(self.ledger.as_ref(), pool, self.policy.needs_token1(), self.call_timeout)
                .await?;
        let snapshot = reconcile(&state.reserves, &state.ordering, src, dst, self.policy)?;
        let amount_out = get_amount_out(&amount_in, &snapshot.reserve_in, &snapshot.reserve_out)?;

        log::debug!(
            "estimate pool={} {}->{} amount_in={} reserve_in={} reserve_out={} amount_out={}",
            pool,
            token_label(&src),
            token_label(&dst),
            amount_in,
            snapshot.reserve_in,
            snapshot.reserve_out,
            amount_out
        );

        Ok(SwapQuote {
            amount_in,
            amount_out,
            reserve_in: snapshot.reserve_in,
            reserve_out: snapshot.reserve_out,
            ledger_calls: state.ledger_calls(),
        })
    }

    /// Parses textual parameters, then [`estimate`](Self::estimate)s.
    ///
    /// Input errors are reported before any ledger read happens.
    pub async fn estimate_str(
        &self,
        pool: &str,
        src: &str,
        dst: &str,
        amount_in: &str,
    ) -> Result<SwapQuote, EstimateError> {
        let pool = parse_address("pool", pool)?;
        let src = parse_address("src", src)?;
        let dst = parse_address("dst", dst)?;
        let amount_in = parse_amount(amount_in)?;
        self.estimate(pool, src, dst, amount_in).await
    }
}
