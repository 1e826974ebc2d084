//! Mock Ledger 系统借鉴 httpmock 设计
//!
//! 支持三种模式：
//! - Record: 调用真实节点并保存 `eth_call` 响应
//! - Replay: 从本地文件重放响应
//! - Live: 直接调用真实节点
//!
//! ## 使用方法
//!
//! ```bash
//! # 录制模式
//! MOCK_MODE=record ETH_NODE_URL=https://... cargo test --test estimator_tests
//!
//! # 重放模式（无需节点）
//! MOCK_MODE=replay cargo test --test estimator_tests
//! ```

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::ledger_client::{LedgerClient, decode_hex_payload, eth_call_params};
use crate::error::LedgerError;

const ETH_CALL: &str = "eth_call";

/// Mock 模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// 录制模式：调用真实节点并保存响应
    Record,
    /// 重放模式：从本地文件读取响应
    Replay,
    /// 直播模式：直接调用真实节点
    Live,
}

impl MockMode {
    /// 从环境变量 `MOCK_MODE` 读取模式
    pub fn from_env() -> Self {
        match std::env::var("MOCK_MODE").as_deref() {
            Ok("record") => MockMode::Record,
            Ok("replay") => MockMode::Replay,
            _ => MockMode::Live,
        }
    }
}

/// Record / replay ledger client.
///
/// `inner` is only required for `Record` and `Live`; a replay-only client can be
/// built without any node.
pub struct MockLedgerClient {
    inner: Option<Arc<dyn LedgerClient>>,
    pub mode: MockMode,
    pub mock_dir: String,
}

impl MockLedgerClient {
    /// Mode from `MOCK_MODE`, directory from `MOCK_DIR` (default `tests/mock_data`).
    pub fn new(inner: Option<Arc<dyn LedgerClient>>) -> Self {
        Self::new_with_mode(inner, MockMode::from_env())
    }

    pub fn new_with_mode(inner: Option<Arc<dyn LedgerClient>>, mode: MockMode) -> Self {
        let mock_dir =
            std::env::var("MOCK_DIR").unwrap_or_else(|_| "tests/mock_data".to_string());
        Self { inner, mode, mock_dir }
    }

    /// Replay-only client reading from `mock_dir`.
    pub fn replay(mock_dir: impl Into<String>) -> Self {
        Self { inner: None, mode: MockMode::Replay, mock_dir: mock_dir.into() }
    }

    pub fn mode(&self) -> MockMode {
        self.mode
    }

    pub fn mock_dir(&self) -> &str {
        &self.mock_dir
    }

    fn live(&self) -> Result<&Arc<dyn LedgerClient>, LedgerError> {
        self.inner
            .as_ref()
            .ok_or_else(|| LedgerError::Mock(format!("{:?} mode needs a live client", self.mode)))
    }

    /// 保存录制到文件
    pub fn save_recording(
        &self,
        method: &str,
        params: &Value,
        response: &Value,
    ) -> Result<(), LedgerError> {
        fs::create_dir_all(&self.mock_dir)
            .map_err(|e| LedgerError::Mock(format!("cannot create {}: {e}", self.mock_dir)))?;

        let file_path = Path::new(&self.mock_dir).join(self.generate_file_name(method, params));
        let mock_data = serde_json::json!({
            "method": method,
            "params": params,
            "response": response
        });
        let json = serde_json::to_string_pretty(&mock_data)
            .map_err(|e| LedgerError::Mock(format!("serialize recording: {e}")))?;
        fs::write(&file_path, json)
            .map_err(|e| LedgerError::Mock(format!("write {}: {e}", file_path.display())))
    }

    /// 从文件加载录制
    pub fn load_recording(&self, method: &str, params: &Value) -> Result<Value, LedgerError> {
        let file_path = Path::new(&self.mock_dir).join(self.generate_file_name(method, params));

        let content = fs::read_to_string(&file_path).map_err(|e| {
            LedgerError::Mock(format!("no recording at {}: {e}", file_path.display()))
        })?;
        let mock_data: Value = serde_json::from_str(&content).map_err(|e| {
            LedgerError::Mock(format!("bad recording {}: {e}", file_path.display()))
        })?;

        mock_data
            .get("response")
            .cloned()
            .ok_or_else(|| LedgerError::Mock("recording has no response field".to_string()))
    }

    /// 生成文件名
    ///
    /// 格式: {method}_{params_hash}.json
    pub fn generate_file_name(&self, method: &str, params: &Value) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        params.to_string().hash(&mut hasher);
        format!("{}_{:016x}.json", method, hasher.finish())
    }

    /// 检查 Mock 数据是否存在
    pub fn has_mock_data(&self, method: &str, params: &Value) -> bool {
        Path::new(&self.mock_dir).join(self.generate_file_name(method, params)).exists()
    }

    /// 清理所有 Mock 数据
    pub fn clear_mock_data(&self) {
        if fs::remove_dir_all(&self.mock_dir).is_ok() {
            log::info!("cleared mock data directory {}", self.mock_dir);
        }
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, LedgerError> {
        let params = eth_call_params(&contract, &calldata);
        match self.mode {
            MockMode::Record => {
                let response = self.live()?.call(contract, calldata).await?;
                let encoded = Value::String(format!("0x{}", hex::encode(&response)));
                self.save_recording(ETH_CALL, &params, &encoded)?;
                Ok(response)
            }
            MockMode::Replay => {
                let recorded = self.load_recording(ETH_CALL, &params)?;
                let payload = recorded.as_str().ok_or_else(|| {
                    LedgerError::Mock("recorded response is not a hex string".to_string())
                })?;
                decode_hex_payload(payload)
            }
            MockMode::Live => self.live()?.call(contract, calldata).await,
        }
    }
}
