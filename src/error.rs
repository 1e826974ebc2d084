//! 报价错误类型
//!
//! Every failure of an estimate carries the sub-operation that produced it so the
//! HTTP layer (or any other caller) can report something actionable. Nothing in
//! here is retried automatically.

use alloy_primitives::Address;
use num_bigint::BigUint;
use std::fmt;
use std::time::Duration;

/// The remote read that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOp {
    GetReserves,
    Token0,
    Token1,
}

impl LedgerOp {
    /// Solidity method name behind the read.
    pub fn method(&self) -> &'static str {
        match self {
            LedgerOp::GetReserves => "getReserves",
            LedgerOp::Token0 => "token0",
            LedgerOp::Token1 => "token1",
        }
    }
}

impl fmt::Display for LedgerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// Failures of the ledger node capability itself.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node returned error {code}: {message}")]
    Node { code: i64, message: String },
    #[error("invalid node response: {0}")]
    InvalidResponse(String),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error("mock ledger: {0}")]
    Mock(String),
}

/// 报价错误
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid address for {field}: {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("failed to call {op}: {source}")]
    RpcFailure {
        op: LedgerOp,
        #[source]
        source: LedgerError,
    },
    #[error("failed to decode {op} result: {source}")]
    DecodeFailure {
        op: LedgerOp,
        #[source]
        source: alloy_sol_types::Error,
    },
    #[error("token pair {src}/{dst} does not match pool tokens ({})", pool_tokens(.token0, .token1))]
    TokenMismatch {
        src: Address,
        dst: Address,
        token0: Address,
        token1: Option<Address>,
    },
    #[error("pool has zero reserves (reserve_in {reserve_in}, reserve_out {reserve_out})")]
    ZeroReserves {
        reserve_in: BigUint,
        reserve_out: BigUint,
    },
}

fn pool_tokens(token0: &Address, token1: &Option<Address>) -> String {
    match token1 {
        Some(token1) => format!("token0 {token0}, token1 {token1}"),
        None => format!("token0 {token0}"),
    }
}

impl EstimateError {
    /// True when the caller supplied malformed data; such errors never reach the ledger.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EstimateError::MissingParameter(_)
                | EstimateError::InvalidAddress { .. }
                | EstimateError::InvalidAmount(_)
        )
    }

    /// The remote read involved in the failure, if any.
    pub fn ledger_op(&self) -> Option<LedgerOp> {
        match self {
            EstimateError::RpcFailure { op, .. } | EstimateError::DecodeFailure { op, .. } => {
                Some(*op)
            }
            _ => None,
        }
    }

    pub(crate) fn rpc(op: LedgerOp) -> impl FnOnce(LedgerError) -> Self {
        move |source| EstimateError::RpcFailure { op, source }
    }

    pub(crate) fn decode(op: LedgerOp) -> impl FnOnce(alloy_sol_types::Error) -> Self {
        move |source| EstimateError::DecodeFailure { op, source }
    }
}
