pub mod reconcile;
pub mod uniswap_v2;

pub use reconcile::{ReserveSnapshot, reconcile};
pub use uniswap_v2::{CanonicalOrdering, PairState, ReservePair};
