//! Portfolio snapshot and stress annotation types.

use super::PortfolioPosition;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annotation describing the stress scenario applied to a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressInfo {
    /// Name of the applied scenario.
    pub scenario_name: String,

    /// Scenario description.
    pub scenario_description: String,

    /// When the scenario was applied.
    pub applied_at: DateTime<Utc>,
}

/// An ordered collection of positions valued at a point in time.
///
/// Snapshots are rebuilt from external inputs each analysis run; the stress
/// applier produces new snapshots rather than mutating existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Portfolio name.
    pub name: String,

    /// Positions, in load order.
    pub positions: Vec<PortfolioPosition>,

    /// Present only on snapshots produced by the stress applier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_info: Option<StressInfo>,
}

impl PortfolioSnapshot {
    /// Creates a snapshot and computes position weights from market values.
    #[must_use]
    pub fn new(name: impl Into<String>, positions: Vec<PortfolioPosition>) -> Self {
        let mut snapshot = Self {
            name: name.into(),
            positions,
            stress_info: None,
        };
        snapshot.recompute_weights();
        snapshot
    }

    /// Creates a snapshot builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> super::SnapshotBuilder {
        super::SnapshotBuilder::new(name)
    }

    /// Returns the number of positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the snapshot has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Total market value across all positions.
    #[must_use]
    pub fn total_market_value(&self) -> Decimal {
        self.positions.iter().map(|p| p.market_value).sum()
    }

    /// Total market value as `f64` for analytic use.
    #[must_use]
    pub fn total_market_value_f64(&self) -> f64 {
        self.total_market_value().to_f64().unwrap_or(0.0)
    }

    /// Recomputes every position weight as market value / total market value.
    ///
    /// Weights are left untouched when the total is zero.
    pub fn recompute_weights(&mut self) {
        let total = self.total_market_value_f64();
        if total == 0.0 {
            return;
        }
        for position in &mut self.positions {
            position.weight = position.market_value_f64() / total;
        }
    }

    /// Current position weights, in position order.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p.weight).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot::new(
            "test",
            vec![
                PortfolioPosition::new("Apple Inc.", "AAPL", dec!(100), dec!(150), "Equity", "USD"),
                PortfolioPosition::new("UST 10Y", "UST10Y", dec!(10), dec!(98.5), "Sovereign", "USD"),
                PortfolioPosition::new("EUR Cash", "EUR", dec!(5000), dec!(1), "Cash", "EUR"),
            ],
        )
    }

    #[test]
    fn test_total_market_value() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.total_market_value(), dec!(20985));
    }

    #[test]
    fn test_weights_sum_to_one() {
        let snapshot = sample_snapshot();
        let sum: f64 = snapshot.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_snapshot_weights_untouched() {
        let mut snapshot = PortfolioSnapshot::new("empty", vec![]);
        snapshot.recompute_weights();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_market_value(), Decimal::ZERO);
    }
}
