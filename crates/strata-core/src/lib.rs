//! # Strata Core
//!
//! Shared data model for the Strata portfolio risk library.
//!
//! This crate provides the inputs and outputs the risk engine and the
//! stress-testing modules exchange:
//!
//! - **Positions and snapshots**: [`types::PortfolioPosition`],
//!   [`types::PortfolioSnapshot`] with market-value-derived weights
//! - **Return preparation**: [`returns::prepare_returns`] turns raw price
//!   records into a dense [`returns::ReturnSeries`]
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: no I/O, no caching; callers own all inputs
//! - **Money vs. statistics**: monetary fields are `Decimal`, analytic
//!   quantities (returns, weights) are `f64`
//! - **Explicit errors**: malformed input fails with a typed error rather
//!   than an empty result

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod returns;
pub mod sim;
pub mod types;

pub use error::{ReturnsError, ReturnsResult};
pub use sim::{CorrelatedSampler, SimulationError};
pub use returns::{prepare_returns, PriceRecord, ReturnFrequency, ReturnMethod, ReturnSeries};
pub use types::{PortfolioPosition, PortfolioSnapshot, SnapshotBuilder, StressInfo};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::error::{ReturnsError, ReturnsResult};
    pub use crate::returns::{
        prepare_returns, PriceRecord, ReturnFrequency, ReturnMethod, ReturnSeries,
    };
    pub use crate::sim::{CorrelatedSampler, SimulationError};
    pub use crate::types::{PortfolioPosition, PortfolioSnapshot, SnapshotBuilder, StressInfo};
}
