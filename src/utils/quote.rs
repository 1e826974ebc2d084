/// Quote / simulation result for a read-only swap estimate.
///
/// Built fresh per request; nothing here is cached.
use num_bigint::BigUint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    /// Input amount (smallest units of the source token).
    pub amount_in: BigUint,
    /// Output amount for an exact-in swap (smallest units of the destination token).
    pub amount_out: BigUint,
    /// Reserve of the source token the quote was computed against.
    pub reserve_in: BigUint,
    /// Reserve of the destination token the quote was computed against.
    pub reserve_out: BigUint,
    /// Number of ledger reads made to produce this quote.
    pub ledger_calls: usize,
}
