pub mod tokens;

pub use tokens::*;

/// Input multiplier after the 0.3% swap fee (`amount_in * 997 / 1000`).
pub const FEE_NUMERATOR: u32 = 997;

/// 手续费分母
pub const FEE_DENOMINATOR: u32 = 1000;

/// Decoded `uint112` reserves never exceed this many bits.
pub const RESERVE_BITS: u64 = 112;

/// Default HTTP port of the estimator service.
pub const DEFAULT_PORT: u16 = 1337;

/// Default deadline for a single ledger read, in milliseconds.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;
