//! Dated return matrix.

use crate::error::{ReturnsError, ReturnsResult};
use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};

/// A dense matrix of period returns.
///
/// Rows are time periods in ascending date order; columns are assets in
/// sorted ticker order. The first undefined differencing row has already
/// been dropped by the preparer, so every row is a valid return
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    values: DMatrix<f64>,
}

impl ReturnSeries {
    /// Creates a return series from its parts.
    ///
    /// Fails when dimensions are inconsistent or dates are not strictly
    /// ascending.
    pub fn new(
        dates: Vec<NaiveDate>,
        assets: Vec<String>,
        values: DMatrix<f64>,
    ) -> ReturnsResult<Self> {
        if values.nrows() != dates.len() || values.ncols() != assets.len() {
            return Err(ReturnsError::invalid_input(format!(
                "return matrix is {}x{} but {} dates and {} assets were given",
                values.nrows(),
                values.ncols(),
                dates.len(),
                assets.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ReturnsError::invalid_input(
                "dates must be strictly ascending",
            ));
        }
        Ok(Self {
            dates,
            assets,
            values,
        })
    }

    /// Number of time periods (rows).
    #[must_use]
    pub fn num_periods(&self) -> usize {
        self.values.nrows()
    }

    /// Number of assets (columns).
    #[must_use]
    pub fn num_assets(&self) -> usize {
        self.values.ncols()
    }

    /// Observation dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Asset tickers, in column order.
    #[must_use]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// The raw return matrix (rows = periods, columns = assets).
    #[must_use]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Return history for one asset, or `None` for an unknown ticker.
    #[must_use]
    pub fn column(&self, ticker: &str) -> Option<Vec<f64>> {
        let idx = self.assets.iter().position(|a| a == ticker)?;
        Some(self.values.column(idx).iter().copied().collect())
    }

    /// Per-asset mean returns.
    #[must_use]
    pub fn mean_vector(&self) -> DVector<f64> {
        let n = self.num_periods() as f64;
        DVector::from_iterator(
            self.num_assets(),
            self.values.column_iter().map(|c| c.sum() / n),
        )
    }

    /// Sample covariance matrix of the per-asset returns (n-1 denominator).
    ///
    /// Fails with `InsufficientData` when fewer than two periods are
    /// available.
    pub fn covariance_matrix(&self) -> ReturnsResult<DMatrix<f64>> {
        let n = self.num_periods();
        if n < 2 {
            return Err(ReturnsError::insufficient(
                "covariance requires at least two return periods",
            ));
        }

        let means = self.mean_vector();
        let mut centered = self.values.clone();
        for (j, mean) in means.iter().enumerate() {
            for i in 0..n {
                centered[(i, j)] -= mean;
            }
        }

        Ok(centered.transpose() * &centered / (n as f64 - 1.0))
    }

    /// Projects the return matrix through a weight vector: p = R * w.
    ///
    /// Fails when the weight vector length does not match the asset count.
    pub fn portfolio_returns(&self, weights: &[f64]) -> ReturnsResult<DVector<f64>> {
        if weights.len() != self.num_assets() {
            return Err(ReturnsError::invalid_input(format!(
                "{} weights given for {} assets",
                weights.len(),
                self.num_assets()
            )));
        }
        let w = DVector::from_column_slice(weights);
        Ok(&self.values * w)
    }
}
