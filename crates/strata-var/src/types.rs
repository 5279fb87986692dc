//! Result types for risk calculations.

use crate::RiskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// VaR calculation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaRMethod {
    /// Historical simulation.
    Historical,
    /// Parametric (variance-covariance).
    Parametric,
    /// Monte Carlo simulation.
    MonteCarlo,
}

impl std::fmt::Display for VaRMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Historical => write!(f, "historical"),
            Self::Parametric => write!(f, "parametric"),
            Self::MonteCarlo => write!(f, "monte_carlo"),
        }
    }
}

/// Distribution used for Monte Carlo simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationMethod {
    /// Multivariate normal.
    Normal,
    /// Multivariate Student-t with 5 degrees of freedom (fatter tails).
    StudentT,
    /// Copula-based simulation; declared but not implemented.
    Copula,
}

impl FromStr for SimulationMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "t-dist" | "student-t" => Ok(Self::StudentT),
            "copula" => Ok(Self::Copula),
            other => Err(RiskError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A VaR/CVaR pair at a confidence level and horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaREstimate {
    /// Method used for calculation.
    pub method: VaRMethod,
    /// Confidence level (e.g., 0.95 for 95%).
    pub confidence_level: f64,
    /// Time horizon in days.
    pub time_horizon_days: u32,
    /// Value-at-Risk, as a positive loss fraction of portfolio value.
    pub var: f64,
    /// Conditional VaR (expected shortfall beyond the VaR threshold).
    pub cvar: f64,
}

impl std::fmt::Display for VaREstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VaR({:.0}%, {}d): {:.4} / CVaR: {:.4}",
            self.confidence_level * 100.0,
            self.time_horizon_days,
            self.var,
            self.cvar
        )
    }
}

/// Per-asset entry of the component VaR decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentVaREntry {
    /// Portfolio weight of the asset.
    pub weight: f64,
    /// Marginal VaR contribution (d VaR / d weight).
    pub marginal_contribution: f64,
    /// Component VaR (weight x marginal contribution, horizon-scaled).
    pub component_var: f64,
    /// Component as a percentage of total VaR.
    pub percent_contribution: f64,
}

/// Additive per-asset decomposition of parametric VaR.
///
/// The Euler property holds: components sum to the volatility part of
/// total VaR, so the sum matches the total within tolerance whenever
/// mean returns are small relative to z * sigma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentVaR {
    /// Confidence level used.
    pub confidence_level: f64,
    /// Time horizon in days.
    pub time_horizon_days: u32,
    /// Total parametric VaR the components decompose.
    pub total_var: f64,
    /// Per-asset entries, keyed by ticker.
    pub entries: BTreeMap<String, ComponentVaREntry>,
}

impl ComponentVaR {
    /// Sum of all component VaR values.
    #[must_use]
    pub fn component_sum(&self) -> f64 {
        self.entries.values().map(|e| e.component_var).sum()
    }
}

/// Per-asset entry of the incremental VaR table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalVaREntry {
    /// Portfolio weight of the asset before the bump.
    pub weight: f64,
    /// Finite-difference VaR sensitivity to the weight bump.
    pub incremental_var: f64,
}

/// Finite-difference sensitivity of total VaR to per-asset weight bumps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalVaR {
    /// Confidence level used.
    pub confidence_level: f64,
    /// Time horizon in days.
    pub time_horizon_days: u32,
    /// Baseline parametric VaR before any bump.
    pub base_var: f64,
    /// Weight increment used for the bump.
    pub increment: f64,
    /// Per-asset entries, keyed by ticker.
    pub entries: BTreeMap<String, IncrementalVaREntry>,
}

/// Full risk metrics document for reporting layers.
///
/// Serializes losslessly to JSON; the decomposition tables are present
/// only when the method supports them (parametric).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetricsResult {
    /// Method used for the headline VaR/CVaR.
    pub method: VaRMethod,
    /// Confidence level.
    pub confidence_level: f64,
    /// Time horizon in days.
    pub time_horizon_days: u32,
    /// Value-at-Risk.
    pub var: f64,
    /// Conditional VaR.
    pub cvar: f64,
    /// Component VaR table, keyed by ticker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_var: Option<BTreeMap<String, ComponentVaREntry>>,
    /// Incremental VaR per ticker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental_var: Option<BTreeMap<String, f64>>,
}
