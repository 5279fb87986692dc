//! Typed shock maps.
//!
//! A scenario's shocks mix a flat factor -> shock layer with one
//! specially nested factor: `fx`, a currency -> shock sub-map. Modelling
//! the two levels explicitly (rather than an untyped dynamic map) means
//! factor iteration can never confuse a nested map for a scalar shock,
//! and iteration order is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relative shocks to risk factors, with a nested currency sub-map.
///
/// Shock values are signed fractions: -0.40 means a 40% fall. The JSON
/// form keeps the original document shape - factor shocks are flattened
/// to top-level keys next to the nested `fx` object:
///
/// ```json
/// { "equity": -0.40, "interest_rate": -0.01, "fx": { "EUR": -0.15 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShockSet {
    /// Currency -> relative shock.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fx: BTreeMap<String, f64>,

    /// Risk factor name -> relative shock.
    #[serde(flatten)]
    pub factors: BTreeMap<String, f64>,
}

impl ShockSet {
    /// Creates an empty shock set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factor shock.
    #[must_use]
    pub fn with_factor(mut self, factor: impl Into<String>, shock: f64) -> Self {
        self.factors.insert(factor.into(), shock);
        self
    }

    /// Adds a currency shock to the fx sub-map.
    #[must_use]
    pub fn with_fx(mut self, currency: impl Into<String>, shock: f64) -> Self {
        self.fx.insert(currency.into(), shock);
        self
    }

    /// Returns true when no shocks are present at either level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty() && self.fx.is_empty()
    }

    /// Total number of shock entries, fx included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len() + self.fx.len()
    }

    /// Scales every shock value, nested fx entries included.
    #[must_use]
    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            factors: self
                .factors
                .iter()
                .map(|(k, v)| (k.clone(), v * multiplier))
                .collect(),
            fx: self
                .fx
                .iter()
                .map(|(k, v)| (k.clone(), v * multiplier))
                .collect(),
        }
    }

    /// Accumulates `weight` times another shock set into this one,
    /// merging both levels key-wise.
    pub fn add_weighted(&mut self, other: &Self, weight: f64) {
        for (factor, shock) in &other.factors {
            *self.factors.entry(factor.clone()).or_insert(0.0) += shock * weight;
        }
        for (currency, shock) in &other.fx {
            *self.fx.entry(currency.clone()).or_insert(0.0) += shock * weight;
        }
    }

    /// Returns true if every shock value is finite.
    #[must_use]
    pub fn all_finite(&self) -> bool {
        self.factors.values().all(|v| v.is_finite()) && self.fx.values().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> ShockSet {
        ShockSet::new()
            .with_factor("equity", -0.40)
            .with_factor("interest_rate", -0.01)
            .with_fx("EUR", -0.15)
            .with_fx("JPY", 0.10)
    }

    #[test]
    fn test_scaled_includes_fx() {
        let scaled = sample().scaled(0.5);
        assert_relative_eq!(scaled.factors["equity"], -0.20, epsilon = 1e-12);
        assert_relative_eq!(scaled.fx["EUR"], -0.075, epsilon = 1e-12);
    }

    #[test]
    fn test_add_weighted_merges_keywise() {
        let mut combined = ShockSet::new();
        combined.add_weighted(&sample(), 0.5);
        combined.add_weighted(&sample(), 0.5);
        assert_relative_eq!(combined.factors["equity"], -0.40, epsilon = 1e-12);
        assert_relative_eq!(combined.fx["JPY"], 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_json_shape_matches_store_documents() {
        let json = serde_json::to_value(sample()).unwrap();
        // Factors are top-level keys; fx is the one nested object.
        assert_relative_eq!(json["equity"].as_f64().unwrap(), -0.40, epsilon = 1e-12);
        assert_relative_eq!(json["fx"]["EUR"].as_f64().unwrap(), -0.15, epsilon = 1e-12);

        let back: ShockSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_all_finite() {
        assert!(sample().all_finite());
        let bad = sample().with_factor("volatility", f64::NAN);
        assert!(!bad.all_finite());
    }
}
