//! # Strata VaR
//!
//! Value-at-Risk engine for the Strata portfolio risk library.
//!
//! VaR estimates the loss threshold not expected to be exceeded with
//! probability `c` over a horizon of `h` days; CVaR (expected shortfall)
//! is the expected loss conditional on breaching that threshold. This
//! crate computes both by three methods over a prepared
//! [`strata_core::ReturnSeries`], plus two risk decompositions:
//!
//! - **Historical**: empirical percentile of the portfolio return sample
//! - **Parametric**: closed-form normal (variance-covariance)
//! - **Monte Carlo**: multivariate normal or Student-t simulation
//! - **Component VaR**: additive per-asset Euler decomposition
//! - **Incremental VaR**: finite-difference weight sensitivity
//!
//! ## Concurrency
//!
//! [`VaREngine`] carries the configured return series as mutable state.
//! Use one engine instance per computation (or synchronize externally)
//! rather than sharing an instance across concurrent callers with
//! different data.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

mod engine;
pub mod error;
mod stats;
pub mod types;

pub use engine::VaREngine;
pub use error::{RiskError, RiskResult};
pub use types::{
    ComponentVaR, ComponentVaREntry, IncrementalVaR, IncrementalVaREntry, RiskMetricsResult,
    SimulationMethod, VaREstimate, VaRMethod,
};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::engine::VaREngine;
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::types::{
        ComponentVaR, ComponentVaREntry, IncrementalVaR, IncrementalVaREntry, RiskMetricsResult,
        SimulationMethod, VaREstimate, VaRMethod,
    };
}
