pub mod ledger_client;
pub mod mock_rpc;
pub mod types;

pub use ledger_client::{HttpLedgerClient, LedgerClient};
pub use types::*;
