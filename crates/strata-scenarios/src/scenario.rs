//! Scenario type and provenance metadata.

use crate::ShockSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The historical window a scenario was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalWindow {
    /// Window start date.
    pub start_date: NaiveDate,
    /// Window end date.
    pub end_date: NaiveDate,
}

/// Parameters of a sensitivity-analysis scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityInfo {
    /// The factor being analysed.
    pub factor: String,
    /// Base value of the factor.
    pub base_value: f64,
    /// Target value the scenario shocks the factor to.
    pub target_value: f64,
    /// The resulting relative shock.
    pub relative_shock: f64,
}

/// Provenance of a combined scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationProvenance {
    /// Names of the source scenarios.
    pub sources: Vec<String>,
    /// Normalized weights applied to each source.
    pub weights: Vec<f64>,
}

/// Position of a scenario within a Monte Carlo batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloInfo {
    /// 1-based index within the batch.
    pub scenario_number: usize,
    /// Total scenarios in the batch.
    pub total_scenarios: usize,
}

/// A named set of relative shocks used to stress a portfolio.
///
/// Scenarios are value types: the catalog constructs them, the store
/// persists them by name, and the applier consumes them without
/// mutation. All provenance metadata is optional and omitted from the
/// JSON document when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name (also the store key).
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// The shocks to apply.
    pub shocks: ShockSet,

    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Severity multiplier used when deriving from a predefined scenario.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<f64>,

    /// True for scenarios taken from the predefined registry.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub predefined: bool,

    /// Set on scenarios derived from a historical window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_window: Option<HistoricalWindow>,

    /// Set on sensitivity-analysis scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivityInfo>,

    /// Set on combined scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_from: Option<CombinationProvenance>,

    /// Set on Monte-Carlo-generated scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloInfo>,
}

impl Scenario {
    /// Creates a scenario with no provenance metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, shocks: ShockSet) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            shocks,
            created_at: None,
            severity: None,
            predefined: false,
            historical_window: None,
            sensitivity: None,
            combined_from: None,
            monte_carlo: None,
        }
    }

    /// Stamps the creation timestamp to now.
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.created_at = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_omits_metadata() {
        let scenario = Scenario::new(
            "test",
            "a test scenario",
            ShockSet::new().with_factor("equity", -0.1),
        );
        let json = serde_json::to_value(&scenario).unwrap();

        assert_eq!(json["name"], "test");
        assert!(json.get("severity").is_none());
        assert!(json.get("predefined").is_none());
        assert!(json.get("combined_from").is_none());
    }

    #[test]
    fn test_roundtrip_with_metadata() {
        let mut scenario = Scenario::new(
            "crash_replay",
            "replay of a drawdown",
            ShockSet::new().with_factor("equity", -0.3).with_fx("EUR", -0.05),
        )
        .stamped();
        scenario.historical_window = Some(HistoricalWindow {
            start_date: NaiveDate::from_ymd_opt(2020, 2, 19).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2020, 3, 23).unwrap(),
        });

        let json = serde_json::to_string(&scenario).unwrap();
        let back: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(scenario, back);
    }
}
