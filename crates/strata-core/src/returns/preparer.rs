//! Return preparation: pivot price records, difference, resample.

use super::ReturnSeries;
use crate::error::{ReturnsError, ReturnsResult};
use chrono::{Datelike, NaiveDate};
use log::warn;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// A single raw price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Observation date.
    pub date: NaiveDate,

    /// Asset identifier.
    pub ticker: String,

    /// Observed price (must be positive).
    pub price: f64,
}

impl PriceRecord {
    /// Creates a price record.
    #[must_use]
    pub fn new(date: NaiveDate, ticker: impl Into<String>, price: f64) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            price,
        }
    }
}

/// How period returns are computed from consecutive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMethod {
    /// Simple returns: (P_t - P_{t-1}) / P_{t-1}.
    Simple,
    /// Logarithmic returns: ln(P_t / P_{t-1}).
    Log,
}

impl FromStr for ReturnMethod {
    type Err = ReturnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "log" => Ok(Self::Log),
            other => Err(ReturnsError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReturnMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Log => write!(f, "log"),
        }
    }
}

/// Target frequency of the prepared return series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnFrequency {
    /// Keep returns at the observation frequency.
    Daily,
    /// Compound within ISO weeks.
    Weekly,
    /// Compound within calendar months.
    Monthly,
}

impl FromStr for ReturnFrequency {
    type Err = ReturnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Self::Daily),
            "weekly" | "w" => Ok(Self::Weekly),
            "monthly" | "m" => Ok(Self::Monthly),
            other => Err(ReturnsError::UnsupportedFrequency(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReturnFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Turns raw price records into a dense [`ReturnSeries`].
///
/// The records are pivoted into a date x ticker price grid (dates
/// ascending, tickers sorted). Duplicate (date, ticker) pairs are
/// rejected; rows missing a price for any asset are dropped with a
/// warning so the matrix stays dense. Returns are then computed with
/// `method`, the first (undefined) row is dropped, and the series is
/// optionally compounded into weekly or monthly buckets:
/// aggregate = prod(1 + r_i) - 1 over each bucket.
pub fn prepare_returns(
    records: &[PriceRecord],
    method: ReturnMethod,
    frequency: ReturnFrequency,
) -> ReturnsResult<ReturnSeries> {
    let (dates, assets, prices) = pivot_prices(records)?;

    if dates.len() < 2 {
        return Err(ReturnsError::insufficient(format!(
            "need at least 2 complete price rows, got {}",
            dates.len()
        )));
    }

    // Difference consecutive rows; the first row has no predecessor.
    let periods = dates.len() - 1;
    let mut returns = DMatrix::zeros(periods, assets.len());
    for t in 1..dates.len() {
        for j in 0..assets.len() {
            let prev = prices[(t - 1, j)];
            let curr = prices[(t, j)];
            returns[(t - 1, j)] = match method {
                ReturnMethod::Simple => (curr - prev) / prev,
                ReturnMethod::Log => (curr / prev).ln(),
            };
        }
    }
    let return_dates = dates[1..].to_vec();

    match frequency {
        ReturnFrequency::Daily => ReturnSeries::new(return_dates, assets, returns),
        ReturnFrequency::Weekly => {
            let (d, v) = resample(&return_dates, &returns, |date| {
                let week = date.iso_week();
                (week.year(), week.week())
            });
            ReturnSeries::new(d, assets, v)
        }
        ReturnFrequency::Monthly => {
            let (d, v) = resample(&return_dates, &returns, |date| {
                (date.year(), date.month())
            });
            ReturnSeries::new(d, assets, v)
        }
    }
}

/// Pivots records into an ascending-date, sorted-ticker price grid.
fn pivot_prices(
    records: &[PriceRecord],
) -> ReturnsResult<(Vec<NaiveDate>, Vec<String>, DMatrix<f64>)> {
    let mut grid: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut tickers: BTreeSet<String> = BTreeSet::new();

    for record in records {
        if record.price <= 0.0 || !record.price.is_finite() {
            return Err(ReturnsError::invalid_input(format!(
                "non-positive price {} for {} on {}",
                record.price, record.ticker, record.date
            )));
        }
        tickers.insert(record.ticker.clone());
        let row = grid.entry(record.date).or_default();
        if row.insert(record.ticker.clone(), record.price).is_some() {
            return Err(ReturnsError::duplicate(&record.ticker, record.date));
        }
    }

    let assets: Vec<String> = tickers.into_iter().collect();

    // Keep only rows with a price for every asset.
    let total_rows = grid.len();
    let complete: Vec<(NaiveDate, Vec<f64>)> = grid
        .into_iter()
        .filter_map(|(date, row)| {
            let prices: Option<Vec<f64>> =
                assets.iter().map(|a| row.get(a).copied()).collect();
            prices.map(|p| (date, p))
        })
        .collect();

    let dropped = total_rows - complete.len();
    if dropped > 0 {
        warn!("dropped {dropped} incomplete price rows of {total_rows}");
    }

    let dates: Vec<NaiveDate> = complete.iter().map(|(d, _)| *d).collect();
    let mut prices = DMatrix::zeros(complete.len(), assets.len());
    for (i, (_, row)) in complete.iter().enumerate() {
        for (j, price) in row.iter().enumerate() {
            prices[(i, j)] = *price;
        }
    }

    Ok((dates, assets, prices))
}

/// Compounds returns into buckets keyed by `bucket_of`, labelling each
/// bucket with its last observed date.
fn resample<K: PartialEq>(
    dates: &[NaiveDate],
    returns: &DMatrix<f64>,
    bucket_of: impl Fn(&NaiveDate) -> K,
) -> (Vec<NaiveDate>, DMatrix<f64>) {
    let ncols = returns.ncols();
    let mut out_dates: Vec<NaiveDate> = Vec::new();
    let mut out_rows: Vec<Vec<f64>> = Vec::new();

    let mut current_key: Option<K> = None;
    for (i, date) in dates.iter().enumerate() {
        let key = bucket_of(date);
        let start_new = current_key.as_ref() != Some(&key);
        if start_new {
            current_key = Some(key);
            out_dates.push(*date);
            out_rows.push(vec![1.0; ncols]);
        } else if let Some(label) = out_dates.last_mut() {
            // Bucket label advances to the latest date seen.
            *label = *date;
        }
        if let Some(row) = out_rows.last_mut() {
            for j in 0..ncols {
                row[j] *= 1.0 + returns[(i, j)];
            }
        }
    }

    let nrows = out_rows.len();
    let mut values = DMatrix::zeros(nrows, ncols);
    for (i, row) in out_rows.iter().enumerate() {
        for (j, compounded) in row.iter().enumerate() {
            values[(i, j)] = compounded - 1.0;
        }
    }

    (out_dates, values)
}
