//! Price-to-return preparation.
//!
//! [`prepare_returns`] pivots raw price records into a dense, dated
//! return matrix ([`ReturnSeries`]) ready for the risk engine.

mod preparer;
mod series;

pub use preparer::{prepare_returns, PriceRecord, ReturnFrequency, ReturnMethod};
pub use series::ReturnSeries;
