//! # strata-scenarios
//!
//! Stress testing for the Strata risk library.
//!
//! This crate provides scenario-based portfolio stress testing:
//!
//! - **Catalog**: predefined crisis scenarios with adjustable severity,
//!   plus custom, historical, sensitivity, Monte Carlo and combined
//!   scenario construction
//! - **Store**: file-backed persistence of scenarios as JSON documents
//! - **Application**: repricing a portfolio snapshot under a scenario's
//!   shocks, with portfolio-level impact summaries and batch runs
//!
//! ## Example
//!
//! ```ignore
//! use strata_scenarios::prelude::*;
//!
//! let catalog = ScenarioCatalog::standard();
//! let crisis = catalog.predefined("financial_crisis_2008", 1.5)?;
//! let outcome = apply_scenario(&snapshot, &crisis, &AssetClassMap::default())?;
//! println!("impact: {:.2}%", outcome.impact.impact_percentage);
//! ```

#![warn(missing_docs)]

pub mod apply;
pub mod catalog;
mod error;
pub mod scenario;
pub mod shocks;
pub mod store;

pub use apply::{
    apply_scenario, run_batch, AssetClassMap, BatchStressReport, ImpactSummary, ScenarioFailure,
    StressOutcome,
};
pub use catalog::{MarketObservation, ScenarioCatalog};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::{
    CombinationProvenance, HistoricalWindow, MonteCarloInfo, Scenario, SensitivityInfo,
};
pub use shocks::ShockSet;
pub use store::ScenarioStore;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::apply::{
        apply_scenario, run_batch, AssetClassMap, BatchStressReport, ImpactSummary, StressOutcome,
    };
    pub use crate::catalog::{MarketObservation, ScenarioCatalog};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::scenario::Scenario;
    pub use crate::shocks::ShockSet;
    pub use crate::store::ScenarioStore;
}
