//! Applies scenarios to portfolio snapshots.
//!
//! Application never mutates its inputs: each run clones the snapshot,
//! revalues the affected positions and returns the stressed copy next
//! to an impact summary. Shocks compose multiplicatively, asset-class
//! factors first (alphabetically), then fx.

use crate::{Scenario, ScenarioError, ScenarioResult};
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strata_core::{PortfolioSnapshot, StressInfo};

/// Maps shock factor names to the portfolio asset classes they hit.
///
/// The default mapping covers the common factor vocabulary; extend it
/// with [`AssetClassMap::with_mapping`] for bespoke factors. Factors
/// with no mapping are skipped during application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassMap {
    mapping: BTreeMap<String, Vec<String>>,
}

impl Default for AssetClassMap {
    fn default() -> Self {
        let mut mapping = BTreeMap::new();
        let insert = |m: &mut BTreeMap<String, Vec<String>>, factor: &str, classes: &[&str]| {
            m.insert(
                factor.to_string(),
                classes.iter().map(|c| (*c).to_string()).collect(),
            );
        };
        insert(&mut mapping, "equity", &["Equity", "Stock"]);
        insert(&mut mapping, "bond", &["Bond", "Fixed Income"]);
        insert(&mut mapping, "credit", &["Corporate Bond", "Credit"]);
        insert(&mut mapping, "sovereign", &["Government Bond", "Sovereign"]);
        insert(&mut mapping, "real_estate", &["Real Estate", "REIT"]);
        insert(&mut mapping, "commodity", &["Commodity", "Commodities"]);
        insert(&mut mapping, "cash", &["Cash", "Money Market"]);
        Self { mapping }
    }
}

impl AssetClassMap {
    /// Creates an empty mapping (every factor will be skipped).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            mapping: BTreeMap::new(),
        }
    }

    /// Adds or replaces the asset classes a factor applies to.
    #[must_use]
    pub fn with_mapping(
        mut self,
        factor: impl Into<String>,
        classes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.mapping
            .insert(factor.into(), classes.into_iter().map(Into::into).collect());
        self
    }

    /// Asset classes the factor applies to, if mapped.
    #[must_use]
    pub fn classes_for(&self, factor: &str) -> Option<&[String]> {
        self.mapping.get(factor).map(Vec::as_slice)
    }
}

/// Value impact of one scenario on one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// The applied scenario.
    pub scenario_name: String,
    /// Portfolio value before the shock.
    pub original_value: Decimal,
    /// Portfolio value after the shock.
    pub stressed_value: Decimal,
    /// Signed value change (stressed minus original).
    pub impact_value: Decimal,
    /// Signed change as a percentage of the original value.
    pub impact_percentage: f64,
}

impl ImpactSummary {
    /// Returns true if the scenario increased portfolio value.
    #[must_use]
    pub fn is_gain(&self) -> bool {
        self.impact_value > Decimal::ZERO
    }

    /// Returns true if the scenario decreased portfolio value.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.impact_value < Decimal::ZERO
    }
}

/// Result of applying one scenario: the stressed snapshot plus summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressOutcome {
    /// Revalued snapshot carrying stress provenance.
    pub snapshot: PortfolioSnapshot,
    /// Portfolio-level impact numbers.
    pub impact: ImpactSummary,
}

/// One scenario that failed during a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    /// Scenario that failed.
    pub scenario_name: String,
    /// Rendered error.
    pub error: String,
}

/// Outcomes and failures of a batch stress run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStressReport {
    /// Successful applications, in input order.
    pub outcomes: Vec<StressOutcome>,
    /// Scenarios that could not be applied.
    pub failures: Vec<ScenarioFailure>,
}

impl BatchStressReport {
    /// Number of successful outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true when no scenario succeeded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The outcome with the largest portfolio loss, if any succeeded.
    #[must_use]
    pub fn worst_case(&self) -> Option<&StressOutcome> {
        self.outcomes
            .iter()
            .min_by(|a, b| a.impact.impact_value.cmp(&b.impact.impact_value))
    }
}

/// Applies a scenario to a snapshot, returning the stressed copy.
///
/// Asset-class factor shocks are applied in alphabetical factor order,
/// then currency shocks; each hit multiplies the position's price and
/// market value by `1 + shock`, so repeated hits compound. Factors
/// without an asset-class mapping are skipped. Fails with
/// `InvalidInput` when any shock value is non-finite.
pub fn apply_scenario(
    snapshot: &PortfolioSnapshot,
    scenario: &Scenario,
    asset_classes: &AssetClassMap,
) -> ScenarioResult<StressOutcome> {
    if !scenario.shocks.all_finite() {
        return Err(ScenarioError::invalid_input(format!(
            "scenario {} contains non-finite shock values",
            scenario.name
        )));
    }

    let original_value = snapshot.total_market_value();
    let mut stressed = snapshot.clone();

    // BTreeMap iteration gives the alphabetical factor order.
    for (factor, shock) in &scenario.shocks.factors {
        let Some(classes) = asset_classes.classes_for(factor) else {
            debug!("factor {factor} has no asset class mapping, skipping");
            continue;
        };
        let multiplier = shock_multiplier(*shock)?;
        for position in &mut stressed.positions {
            if classes.iter().any(|c| c == &position.asset_class) {
                position.price *= multiplier;
                position.market_value *= multiplier;
            }
        }
    }

    for (currency, shock) in &scenario.shocks.fx {
        let multiplier = shock_multiplier(*shock)?;
        for position in &mut stressed.positions {
            if position.currency == *currency {
                position.price *= multiplier;
                position.market_value *= multiplier;
            }
        }
    }

    stressed.recompute_weights();
    stressed.stress_info = Some(StressInfo {
        scenario_name: scenario.name.clone(),
        scenario_description: scenario.description.clone(),
        applied_at: Utc::now(),
    });

    let stressed_value = stressed.total_market_value();
    let impact_value = stressed_value - original_value;
    let impact_percentage = if original_value.is_zero() {
        0.0
    } else {
        (impact_value / original_value).to_f64().unwrap_or(0.0) * 100.0
    };

    Ok(StressOutcome {
        snapshot: stressed,
        impact: ImpactSummary {
            scenario_name: scenario.name.clone(),
            original_value,
            stressed_value,
            impact_value,
            impact_percentage,
        },
    })
}

/// Applies every scenario to the same base snapshot, collecting
/// failures instead of aborting the batch.
pub fn run_batch(
    snapshot: &PortfolioSnapshot,
    scenarios: &[Scenario],
    asset_classes: &AssetClassMap,
) -> BatchStressReport {
    let mut outcomes = Vec::with_capacity(scenarios.len());
    let mut failures = Vec::new();

    for scenario in scenarios {
        match apply_scenario(snapshot, scenario, asset_classes) {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => {
                warn!("scenario {} failed: {error}", scenario.name);
                failures.push(ScenarioFailure {
                    scenario_name: scenario.name.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    BatchStressReport { outcomes, failures }
}

fn shock_multiplier(shock: f64) -> ScenarioResult<Decimal> {
    Decimal::from_f64(1.0 + shock).ok_or_else(|| {
        ScenarioError::invalid_input(format!("shock {shock} is out of representable range"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShockSet;
    use rust_decimal_macros::dec;
    use strata_core::PortfolioPosition;

    fn sample_snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot::new(
            "test",
            vec![
                PortfolioPosition::new("Apple Inc.", "AAPL", dec!(10), dec!(100), "Equity", "USD"),
                PortfolioPosition::new("UST 10Y", "UST10Y", dec!(10), dec!(100), "Sovereign", "USD"),
                PortfolioPosition::new("EUR Cash", "EURCASH", dec!(1000), dec!(1), "Cash", "EUR"),
            ],
        )
    }

    #[test]
    fn test_equity_shock_revalues_equity_only() {
        let snapshot = sample_snapshot();
        let scenario = Scenario::new(
            "equity_down",
            "20% equity drawdown",
            ShockSet::new().with_factor("equity", -0.20),
        );

        let outcome = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        let stressed = &outcome.snapshot;

        assert_eq!(stressed.positions[0].market_value, dec!(800));
        assert_eq!(stressed.positions[1].market_value, dec!(1000));
        assert_eq!(stressed.positions[2].market_value, dec!(1000));
        assert_eq!(outcome.impact.impact_value, dec!(-200));
        assert!(outcome.impact.is_loss());
    }

    #[test]
    fn test_fx_shock_hits_currency() {
        let snapshot = sample_snapshot();
        let scenario = Scenario::new(
            "eur_down",
            "EUR depreciation",
            ShockSet::new().with_fx("EUR", -0.10),
        );

        let outcome = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        assert_eq!(outcome.snapshot.positions[2].market_value, dec!(900));
        assert_eq!(outcome.snapshot.positions[0].market_value, dec!(1000));
    }

    #[test]
    fn test_shocks_compound_multiplicatively() {
        // An equity position in EUR takes both the equity and the fx
        // shock: 100 * 0.8 * 0.9 = 72 per share.
        let snapshot = PortfolioSnapshot::new(
            "eu_equity",
            vec![PortfolioPosition::new(
                "SAP SE", "SAP", dec!(1), dec!(100), "Equity", "EUR",
            )],
        );
        let scenario = Scenario::new(
            "double",
            "equity and fx shock",
            ShockSet::new().with_factor("equity", -0.20).with_fx("EUR", -0.10),
        );

        let outcome = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        assert_eq!(outcome.snapshot.positions[0].market_value, dec!(72.0));
    }

    #[test]
    fn test_unmapped_factor_skipped() {
        let snapshot = sample_snapshot();
        let scenario = Scenario::new(
            "vol_up",
            "volatility spike",
            ShockSet::new().with_factor("volatility", 0.25),
        );

        let outcome = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        assert_eq!(outcome.impact.impact_value, Decimal::ZERO);
        assert!(!outcome.impact.is_loss());
        assert!(!outcome.impact.is_gain());
    }

    #[test]
    fn test_zero_shock_is_noop_with_provenance() {
        let snapshot = sample_snapshot();
        let scenario = Scenario::new("flat", "no shocks", ShockSet::new());

        let outcome = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        assert_eq!(
            outcome.snapshot.total_market_value(),
            snapshot.total_market_value()
        );
        let info = outcome.snapshot.stress_info.as_ref().unwrap();
        assert_eq!(info.scenario_name, "flat");
    }

    #[test]
    fn test_input_snapshot_not_mutated() {
        let snapshot = sample_snapshot();
        let before = snapshot.clone();
        let scenario = Scenario::new(
            "crash",
            "equity crash",
            ShockSet::new().with_factor("equity", -0.40),
        );

        let _ = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_stressed_weights_sum_to_one() {
        let snapshot = sample_snapshot();
        let scenario = Scenario::new(
            "crash",
            "equity crash",
            ShockSet::new().with_factor("equity", -0.40),
        );

        let outcome = apply_scenario(&snapshot, &scenario, &AssetClassMap::default()).unwrap();
        let sum: f64 = outcome.snapshot.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_shock_rejected() {
        let snapshot = sample_snapshot();
        let scenario = Scenario::new(
            "bad",
            "broken shock",
            ShockSet::new().with_factor("equity", f64::NAN),
        );
        let result = apply_scenario(&snapshot, &scenario, &AssetClassMap::default());
        assert!(matches!(result, Err(ScenarioError::InvalidInput { .. })));
    }

    #[test]
    fn test_batch_collects_failures() {
        let snapshot = sample_snapshot();
        let good = Scenario::new(
            "ok",
            "mild shock",
            ShockSet::new().with_factor("equity", -0.05),
        );
        let bad = Scenario::new(
            "broken",
            "non-finite",
            ShockSet::new().with_factor("equity", f64::INFINITY),
        );

        let report = run_batch(&snapshot, &[good, bad], &AssetClassMap::default());
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].scenario_name, "broken");
    }

    #[test]
    fn test_worst_case() {
        let snapshot = sample_snapshot();
        let mild = Scenario::new("mild", "", ShockSet::new().with_factor("equity", -0.05));
        let severe = Scenario::new("severe", "", ShockSet::new().with_factor("equity", -0.50));

        let report = run_batch(&snapshot, &[mild, severe], &AssetClassMap::default());
        assert_eq!(report.worst_case().unwrap().impact.scenario_name, "severe");
    }
}
