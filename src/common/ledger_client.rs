//! Ledger 节点访问
//!
//! `LedgerClient` is the single capability the estimator needs from a node: run a
//! read-only contract call and hand back the raw return payload. ABI decoding lives
//! with the pool adapters, so implementations never see typed values.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::LedgerError;

/// Read-only contract call capability.
///
/// Implementations must be safe to share across concurrent estimates.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Executes `eth_call` against `contract` at the latest block.
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, LedgerError>;
}

/// JSON-RPC 2.0 request body.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorObject>,
}

/// Builds the `[{to, data}, "latest"]` parameter list of an `eth_call`.
pub fn eth_call_params(contract: &Address, calldata: &Bytes) -> serde_json::Value {
    json!([
        { "to": contract.to_string(), "data": format!("0x{}", hex::encode(calldata)) },
        "latest"
    ])
}

/// Decodes a `0x`-prefixed hex string returned by the node.
pub fn decode_hex_payload(payload: &str) -> Result<Bytes, LedgerError> {
    let digits = payload.strip_prefix("0x").unwrap_or(payload);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| LedgerError::InvalidResponse(format!("bad hex payload: {e}")))
}

/// HTTP JSON-RPC ledger client.
pub struct HttpLedgerClient {
    http: reqwest::Client,
    node_url: String,
    next_id: AtomicU64,
}

impl HttpLedgerClient {
    /// Creates a client for `node_url`; `timeout` bounds every HTTP request.
    pub fn new(node_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, LedgerError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { http: builder.build()?, node_url: node_url.into(), next_id: AtomicU64::new(1) })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, LedgerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "eth_call",
            params: eth_call_params(&contract, &calldata),
        };

        let response: RpcResponse = self
            .http
            .post(&self.node_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(LedgerError::Node { code: err.code, message: err.message });
        }
        let result = response
            .result
            .ok_or_else(|| LedgerError::InvalidResponse("response has neither result nor error".into()))?;
        decode_hex_payload(&result)
    }
}
