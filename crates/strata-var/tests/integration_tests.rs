//! Integration tests for strata-var.
//!
//! These tests run the full pipeline: raw price records through returns
//! preparation into the VaR engine, across all estimation methods.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use strata_core::{prepare_returns, PriceRecord, ReturnFrequency, ReturnMethod, ReturnSeries};
use strata_var::prelude::*;

/// Builds ~two years of daily prices for three assets with distinct
/// volatilities, from a seeded random walk.
fn sample_prices(seed: u64) -> Vec<PriceRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let specs = [("AAPL", 150.0, 0.020), ("TLT", 98.0, 0.007), ("GLD", 180.0, 0.011)];
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

    let mut records = Vec::new();
    for (ticker, initial, vol) in specs {
        let normal = Normal::new(0.0, vol).unwrap();
        let mut price = initial;
        for day in 0..500 {
            let date = start + chrono::Days::new(day);
            records.push(PriceRecord::new(date, ticker, price));
            let r: f64 = normal.sample(&mut rng);
            price *= 1.0 + r;
        }
    }
    records
}

fn sample_series(seed: u64) -> ReturnSeries {
    prepare_returns(
        &sample_prices(seed),
        ReturnMethod::Simple,
        ReturnFrequency::Daily,
    )
    .unwrap()
}

const WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

#[test]
fn test_pipeline_prices_to_var() {
    let series = sample_series(7);
    assert_eq!(series.num_assets(), 3);
    assert_eq!(series.num_periods(), 499);

    let engine = VaREngine::with_returns(series);
    let estimate = engine.historical_var(&WEIGHTS, 0.95, 1).unwrap();
    assert!(estimate.var > 0.0);
    assert!(estimate.cvar >= estimate.var);
}

#[test]
fn test_methods_agree_in_magnitude() {
    let engine = VaREngine::with_returns(sample_series(7));
    let mut rng = StdRng::seed_from_u64(42);

    let historical = engine.historical_var(&WEIGHTS, 0.95, 1).unwrap();
    let parametric = engine.parametric_var(&WEIGHTS, 0.95, 1).unwrap();
    let monte_carlo = engine
        .monte_carlo_var_with_rng(&WEIGHTS, 0.95, 1, 20_000, SimulationMethod::Normal, &mut rng)
        .unwrap();

    // Gaussian data: all three estimators target the same quantile.
    assert!((historical.var - parametric.var).abs() / parametric.var < 0.15);
    assert!((monte_carlo.var - parametric.var).abs() / parametric.var < 0.05);
}

#[test]
fn test_horizon_scaling_across_methods() {
    let engine = VaREngine::with_returns(sample_series(11));

    for method in [VaRMethod::Historical, VaRMethod::Parametric] {
        let metrics_1d = engine.risk_metrics(&WEIGHTS, 0.99, 1, method).unwrap();
        let metrics_4d = engine.risk_metrics(&WEIGHTS, 0.99, 4, method).unwrap();
        assert!(
            (metrics_4d.var - 2.0 * metrics_1d.var).abs() < 1e-12,
            "sqrt-of-time scaling violated for {method}"
        );
    }
}

#[test]
fn test_component_var_decomposes_total() {
    let engine = VaREngine::with_returns(sample_series(13));

    let parametric = engine.parametric_var(&WEIGHTS, 0.95, 1).unwrap();
    let component = engine.component_var(&WEIGHTS, 0.95, 1).unwrap();

    assert_eq!(component.entries.len(), 3);
    let sum = component.component_sum();
    assert!(
        (sum - parametric.var).abs() / parametric.var < 0.05,
        "component sum {sum} vs total {}",
        parametric.var
    );

    let percent_sum: f64 = component
        .entries
        .values()
        .map(|e| e.percent_contribution)
        .sum();
    assert!((percent_sum - 100.0).abs() < 5.0);
}

#[test]
fn test_risk_metrics_document() {
    let engine = VaREngine::with_returns(sample_series(17));

    let parametric = engine
        .risk_metrics(&WEIGHTS, 0.95, 1, VaRMethod::Parametric)
        .unwrap();
    let component = parametric.component_var.as_ref().unwrap();
    let incremental = parametric.incremental_var.as_ref().unwrap();
    assert_eq!(component.len(), 3);
    assert_eq!(incremental.len(), 3);
    assert!(component.contains_key("AAPL"));

    // The highest-volatility asset dominates risk at these weights.
    let max_ticker = component
        .iter()
        .max_by(|a, b| a.1.component_var.total_cmp(&b.1.component_var))
        .map(|(t, _)| t.as_str());
    assert_eq!(max_ticker, Some("AAPL"));

    let historical = engine
        .risk_metrics(&WEIGHTS, 0.95, 1, VaRMethod::Historical)
        .unwrap();
    assert!(historical.component_var.is_none());
    assert!(historical.incremental_var.is_none());

    let json = serde_json::to_value(&historical).unwrap();
    assert_eq!(json["method"], "historical");
    assert_eq!(json["time_horizon_days"], 1);
    assert!(json.get("component_var").is_none());
}

#[test]
fn test_engine_without_data_fails() {
    let engine = VaREngine::new();
    assert!(matches!(
        engine.historical_var(&WEIGHTS, 0.95, 1),
        Err(RiskError::ReturnsNotSet)
    ));
}

#[test]
fn test_weight_count_mismatch() {
    let engine = VaREngine::with_returns(sample_series(7));
    let result = engine.parametric_var(&[0.5, 0.5], 0.95, 1);
    assert!(matches!(result, Err(RiskError::InvalidInput(_))));
}

#[test]
fn test_monthly_resampled_pipeline() {
    let series = prepare_returns(
        &sample_prices(23),
        ReturnMethod::Log,
        ReturnFrequency::Monthly,
    )
    .unwrap();
    // 500 daily observations span ~17 months.
    assert!(series.num_periods() >= 12 && series.num_periods() <= 18);

    let engine = VaREngine::with_returns(series);
    let estimate = engine.historical_var(&WEIGHTS, 0.95, 1).unwrap();
    assert!(estimate.var > 0.0);
}
