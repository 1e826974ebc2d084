use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_PORT, DEFAULT_RPC_TIMEOUT_MS};

/// How the caller's token pair is matched against the pool's canonical ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Fetch both `token0` and `token1`; the pair must be exactly `{token0, token1}`.
    #[default]
    Strict,
    /// Only fetch `token0` and check one side of the pair (legacy behaviour).
    Token0Only,
}

impl ReconcilePolicy {
    /// Whether the adapter needs the extra `token1()` read.
    pub fn needs_token1(&self) -> bool {
        matches!(self, ReconcilePolicy::Strict)
    }
}

impl FromStr for ReconcilePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ReconcilePolicy::Strict),
            "token0-only" | "token0_only" | "legacy" => Ok(ReconcilePolicy::Token0Only),
            other => Err(ConfigError::Invalid { key: "RECONCILE_POLICY", value: other.to_string() }),
        }
    }
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Estimator service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    pub node_url: String,
    pub port: u16,
    /// Deadline for each ledger read; `None` waits for the node indefinitely.
    pub call_timeout: Option<Duration>,
    pub reconcile_policy: ReconcilePolicy,
}

impl EstimatorConfig {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            port: DEFAULT_PORT,
            call_timeout: Some(Duration::from_millis(DEFAULT_RPC_TIMEOUT_MS)),
            reconcile_policy: ReconcilePolicy::default(),
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            log::info!("No .env file found, using environment variables");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let node_url = lookup("ETH_NODE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("ETH_NODE_URL"))?;
        let mut config = Self::new(node_url);

        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: port.clone() })?;
        }
        if let Some(ms) = lookup("RPC_TIMEOUT_MS").filter(|v| !v.is_empty()) {
            let ms: u64 = ms
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "RPC_TIMEOUT_MS", value: ms.clone() })?;
            config.call_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(policy) = lookup("RECONCILE_POLICY").filter(|v| !v.is_empty()) {
            config.reconcile_policy = policy.parse()?;
        }
        Ok(config)
    }
}
