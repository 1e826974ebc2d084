//! 脚本化 Ledger 客户端
//!
//! Answers pair reads from canned values so estimator and HTTP tests run without a
//! node. Payloads are built word by word to mirror what a real node returns.

#![allow(dead_code)]

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use v2_swap_estimator::common::LedgerClient;
use v2_swap_estimator::error::LedgerError;

pub const GET_RESERVES: [u8; 4] = [0x09, 0x02, 0xf1, 0xac];
pub const TOKEN0: [u8; 4] = [0x0d, 0xfe, 0x16, 0x81];
pub const TOKEN1: [u8; 4] = [0xd2, 0x12, 0x20, 0xa7];

pub fn word(bytes: &[u8]) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[32 - bytes.len()..].copy_from_slice(bytes);
    w
}

pub fn reserves_payload(reserve0: u128, reserve1: u128, timestamp: u32) -> Bytes {
    let mut out = Vec::with_capacity(96);
    out.extend_from_slice(&word(&reserve0.to_be_bytes()));
    out.extend_from_slice(&word(&reserve1.to_be_bytes()));
    out.extend_from_slice(&word(&timestamp.to_be_bytes()));
    Bytes::from(out)
}

pub fn address_payload(address: Address) -> Bytes {
    Bytes::from(word(address.as_slice()).to_vec())
}

/// What one selector answers with.
#[derive(Clone)]
pub enum Reply {
    Payload(Bytes),
    Revert,
    Hang,
}

pub struct ScriptedLedger {
    pub reserves: Reply,
    pub token0: Reply,
    pub token1: Reply,
    pub log: Mutex<Vec<(Address, [u8; 4])>>,
}

impl ScriptedLedger {
    pub fn pair(reserve0: u128, reserve1: u128, token0: Address, token1: Address) -> Self {
        Self {
            reserves: Reply::Payload(reserves_payload(reserve0, reserve1, 1_700_000_000)),
            token0: Reply::Payload(address_payload(token0)),
            token1: Reply::Payload(address_payload(token1)),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn selectors(&self) -> Vec<[u8; 4]> {
        let mut selectors: Vec<_> = self.log.lock().unwrap().iter().map(|(_, s)| *s).collect();
        selectors.sort();
        selectors
    }

    pub fn call_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, LedgerError> {
        let selector: [u8; 4] = calldata[..4].try_into().unwrap();
        self.log.lock().unwrap().push((contract, selector));

        let reply = match selector {
            GET_RESERVES => self.reserves.clone(),
            TOKEN0 => self.token0.clone(),
            TOKEN1 => self.token1.clone(),
            _ => Reply::Revert,
        };
        match reply {
            Reply::Payload(bytes) => Ok(bytes),
            Reply::Revert => {
                Err(LedgerError::Node { code: 3, message: "execution reverted".to_string() })
            }
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LedgerError::InvalidResponse("unreachable".to_string()))
            }
        }
    }
}
