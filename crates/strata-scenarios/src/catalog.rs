//! Scenario catalog: predefined registry and scenario construction.

use crate::scenario::{
    CombinationProvenance, HistoricalWindow, MonteCarloInfo, Scenario, SensitivityInfo,
};
use crate::{ScenarioError, ScenarioResult, ShockSet};
use chrono::NaiveDate;
use log::warn;
use rand::Rng;
use std::collections::BTreeMap;
use strata_core::{CorrelatedSampler, ReturnSeries};

/// A dated observation of one market series, used to derive historical
/// scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketObservation {
    /// Observation date.
    pub date: NaiveDate,
    /// Series / risk factor name.
    pub factor: String,
    /// Observed level.
    pub value: f64,
}

impl MarketObservation {
    /// Creates a market observation.
    #[must_use]
    pub fn new(date: NaiveDate, factor: impl Into<String>, value: f64) -> Self {
        Self {
            date,
            factor: factor.into(),
            value,
        }
    }
}

#[derive(Debug)]
struct PredefinedEntry {
    description: &'static str,
    shocks: ShockSet,
}

/// Defines, scales and combines named shock scenarios.
///
/// The predefined registry is immutable once constructed; hand a catalog
/// value to whatever needs scenarios rather than reaching for a global.
/// All construction methods are pure and safe for unsynchronized
/// concurrent use.
#[derive(Debug)]
pub struct ScenarioCatalog {
    registry: BTreeMap<&'static str, PredefinedEntry>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScenarioCatalog {
    /// Creates the catalog with the standard predefined scenarios:
    /// a 2008-style financial crisis, a rate shock, an inflation shock,
    /// a liquidity crisis and a geopolitical crisis.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = BTreeMap::new();

        registry.insert(
            "financial_crisis_2008",
            PredefinedEntry {
                description: "Simulation of the 2008 financial crisis",
                shocks: ShockSet::new()
                    .with_factor("equity", -0.40)
                    .with_factor("credit_spread", 0.02)
                    .with_factor("interest_rate", -0.01)
                    .with_factor("volatility", 0.20)
                    .with_factor("real_estate", -0.30)
                    .with_fx("USD", 0.0)
                    .with_fx("EUR", -0.15)
                    .with_fx("GBP", -0.20)
                    .with_fx("JPY", 0.10),
            },
        );

        registry.insert(
            "rate_shock",
            PredefinedEntry {
                description: "Interest rate shock",
                shocks: ShockSet::new()
                    .with_factor("interest_rate", 0.02)
                    .with_factor("equity", -0.15)
                    .with_factor("credit_spread", 0.01)
                    .with_factor("volatility", 0.10)
                    .with_fx("USD", 0.0)
                    .with_fx("EUR", -0.05)
                    .with_fx("GBP", -0.08)
                    .with_fx("JPY", 0.03),
            },
        );

        registry.insert(
            "inflation_shock",
            PredefinedEntry {
                description: "Inflation shock",
                shocks: ShockSet::new()
                    .with_factor("interest_rate", 0.03)
                    .with_factor("equity", -0.10)
                    .with_factor("inflation", 0.05)
                    .with_factor("credit_spread", 0.005)
                    .with_factor("commodity", 0.25)
                    .with_fx("USD", 0.0)
                    .with_fx("EUR", -0.07)
                    .with_fx("GBP", -0.05)
                    .with_fx("JPY", -0.03),
            },
        );

        registry.insert(
            "liquidity_crisis",
            PredefinedEntry {
                description: "Liquidity crisis",
                shocks: ShockSet::new()
                    .with_factor("liquidity_premium", 0.03)
                    .with_factor("credit_spread", 0.015)
                    .with_factor("equity", -0.20)
                    .with_factor("bond_liquidity", -0.30)
                    .with_factor("volatility", 0.15)
                    .with_fx("USD", 0.0)
                    .with_fx("EUR", -0.10)
                    .with_fx("GBP", -0.12)
                    .with_fx("JPY", 0.05),
            },
        );

        registry.insert(
            "geopolitical_crisis",
            PredefinedEntry {
                description: "Geopolitical crisis",
                shocks: ShockSet::new()
                    .with_factor("equity", -0.25)
                    .with_factor("energy", 0.40)
                    .with_factor("volatility", 0.25)
                    .with_factor("credit_spread", 0.01)
                    .with_factor("interest_rate", 0.005)
                    .with_fx("USD", 0.0)
                    .with_fx("EUR", -0.08)
                    .with_fx("GBP", -0.05)
                    .with_fx("JPY", 0.08),
            },
        );

        Self { registry }
    }

    /// Names of all predefined scenarios, alphabetical.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.registry.keys().copied().collect()
    }

    /// Returns true if `name` is a registered predefined scenario.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Fetches a predefined scenario, scaling every shock (nested fx
    /// entries included) by `severity`.
    ///
    /// A severity other than 1.0 is annotated in the description. Fails
    /// with `UnknownScenario` for unregistered names.
    pub fn predefined(&self, name: &str, severity: f64) -> ScenarioResult<Scenario> {
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| ScenarioError::unknown(name))?;

        let (shocks, description) = if (severity - 1.0).abs() > f64::EPSILON {
            (
                entry.shocks.scaled(severity),
                format!("{} (severity: {severity:.2}x)", entry.description),
            )
        } else {
            (entry.shocks.clone(), entry.description.to_string())
        };

        let mut scenario = Scenario::new(name, description, shocks).stamped();
        scenario.severity = Some(severity);
        scenario.predefined = true;
        Ok(scenario)
    }

    /// Wraps a caller-supplied shock map into a named scenario with a
    /// creation timestamp.
    #[must_use]
    pub fn custom(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        shocks: ShockSet,
    ) -> Scenario {
        Scenario::new(name, description, shocks).stamped()
    }

    /// Derives a scenario from observed market moves over a window.
    ///
    /// For each factor with at least two observations in `[start, end]`,
    /// the shock is the relative change from the first to the last
    /// in-range value. Fails with `InsufficientData` when no factor has
    /// two in-range observations.
    pub fn historical(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        observations: &[MarketObservation],
    ) -> ScenarioResult<Scenario> {
        if start > end {
            return Err(ScenarioError::invalid_input(format!(
                "window start {start} is after end {end}"
            )));
        }

        // Per-factor in-range observations, ordered by date.
        let mut by_factor: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
        for obs in observations {
            if obs.date >= start && obs.date <= end {
                by_factor
                    .entry(obs.factor.as_str())
                    .or_default()
                    .push((obs.date, obs.value));
            }
        }

        let mut shocks = ShockSet::new();
        for (factor, mut values) in by_factor {
            if values.len() < 2 {
                continue;
            }
            values.sort_by_key(|(date, _)| *date);
            let first = values.first().map(|(_, v)| *v).unwrap_or(0.0);
            let last = values.last().map(|(_, v)| *v).unwrap_or(0.0);
            if first == 0.0 {
                warn!("skipping factor {factor}: zero starting value in window");
                continue;
            }
            shocks.factors.insert(factor.to_string(), (last - first) / first);
        }

        if shocks.is_empty() {
            return Err(ScenarioError::insufficient(format!(
                "fewer than two observations between {start} and {end}"
            )));
        }

        let mut scenario = Scenario::new(name, description, shocks).stamped();
        scenario.historical_window = Some(HistoricalWindow {
            start_date: start,
            end_date: end,
        });
        Ok(scenario)
    }

    /// Monte Carlo scenario generation with a thread-local RNG.
    ///
    /// See [`ScenarioCatalog::monte_carlo_with_rng`].
    pub fn monte_carlo(
        &self,
        base_name: &str,
        description: &str,
        returns: &ReturnSeries,
        count: usize,
    ) -> ScenarioResult<Vec<Scenario>> {
        self.monte_carlo_with_rng(base_name, description, returns, count, &mut rand::thread_rng())
    }

    /// Generates `count` scenarios by sampling the multivariate normal
    /// distribution fitted to historical returns.
    ///
    /// Each sample becomes one scenario whose shock map is the raw
    /// simulated per-factor return, named `{base_name}_{i}` (1-based).
    pub fn monte_carlo_with_rng<R: Rng + ?Sized>(
        &self,
        base_name: &str,
        description: &str,
        returns: &ReturnSeries,
        count: usize,
        rng: &mut R,
    ) -> ScenarioResult<Vec<Scenario>> {
        if count == 0 {
            return Err(ScenarioError::invalid_input(
                "scenario count must be positive",
            ));
        }

        let covariance = returns.covariance_matrix().map_err(|e| {
            ScenarioError::insufficient(format!("cannot fit return distribution: {e}"))
        })?;
        let sampler = CorrelatedSampler::new(returns.mean_vector(), covariance)?;

        let scenarios = sampler
            .sample_normal_batch(count, rng)
            .into_iter()
            .enumerate()
            .map(|(i, sample)| {
                let mut shocks = ShockSet::new();
                for (j, factor) in returns.assets().iter().enumerate() {
                    shocks.factors.insert(factor.clone(), sample[j]);
                }
                let mut scenario = Scenario::new(
                    format!("{base_name}_{}", i + 1),
                    format!("{description} (scenario {}/{count})", i + 1),
                    shocks,
                )
                .stamped();
                scenario.monte_carlo = Some(MonteCarloInfo {
                    scenario_number: i + 1,
                    total_scenarios: count,
                });
                scenario
            })
            .collect();

        Ok(scenarios)
    }

    /// Builds one scenario per target value for sensitivity analysis.
    ///
    /// The relative shock is `(target - base) / base`, or the raw target
    /// when the base value is zero.
    #[must_use]
    pub fn sensitivity(
        &self,
        name: &str,
        description: &str,
        factor: &str,
        base_value: f64,
        targets: &[f64],
    ) -> Vec<Scenario> {
        targets
            .iter()
            .map(|&target| {
                let relative_shock = if base_value == 0.0 {
                    target
                } else {
                    (target - base_value) / base_value
                };

                let mut scenario = Scenario::new(
                    format!("{name}_{factor}_{target}"),
                    format!("{description} ({factor} = {target})"),
                    ShockSet::new().with_factor(factor, relative_shock),
                )
                .stamped();
                scenario.sensitivity = Some(SensitivityInfo {
                    factor: factor.to_string(),
                    base_value,
                    target_value: target,
                    relative_shock,
                });
                scenario
            })
            .collect()
    }

    /// Combines scenarios into one by weighted linear combination of
    /// their shock maps (nested fx maps merged key-wise).
    ///
    /// `None` weights means equal weighting; given weights are
    /// normalized to sum to 1 and must match the scenario count.
    pub fn combine(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        scenarios: &[Scenario],
        weights: Option<&[f64]>,
    ) -> ScenarioResult<Scenario> {
        if scenarios.is_empty() {
            return Err(ScenarioError::invalid_input(
                "cannot combine an empty scenario list",
            ));
        }

        let raw: Vec<f64> = match weights {
            Some(w) => {
                if w.len() != scenarios.len() {
                    return Err(ScenarioError::invalid_input(format!(
                        "{} weights given for {} scenarios",
                        w.len(),
                        scenarios.len()
                    )));
                }
                w.to_vec()
            }
            None => vec![1.0 / scenarios.len() as f64; scenarios.len()],
        };

        let total: f64 = raw.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return Err(ScenarioError::invalid_input(
                "combination weights must sum to a non-zero finite value",
            ));
        }
        let normalized: Vec<f64> = raw.iter().map(|w| w / total).collect();

        let mut shocks = ShockSet::new();
        for (scenario, weight) in scenarios.iter().zip(&normalized) {
            shocks.add_weighted(&scenario.shocks, *weight);
        }

        let mut combined = Scenario::new(name, description, shocks).stamped();
        combined.combined_from = Some(CombinationProvenance {
            sources: scenarios.iter().map(|s| s.name.clone()).collect(),
            weights: normalized,
        });
        Ok(combined)
    }
}
