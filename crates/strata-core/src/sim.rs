//! Correlated sampling from fitted return moments.
//!
//! Both Monte Carlo VaR and Monte Carlo scenario generation draw from a
//! multivariate distribution fitted to historical returns; this module
//! holds the shared sampler.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::{ChiSquared, Distribution, StandardNormal};
use thiserror::Error;

/// Errors from fitting or drawing correlated samples.
#[derive(Error, Debug, Clone)]
pub enum SimulationError {
    /// Covariance matrix is not positive definite even after jitter.
    #[error("covariance matrix is not positive definite")]
    NotPositiveDefinite,

    /// Mean vector and covariance matrix dimensions disagree.
    #[error("mean has {mean_len} entries but covariance is {cov_rows}x{cov_cols}")]
    DimensionMismatch {
        /// Length of the mean vector.
        mean_len: usize,
        /// Covariance row count.
        cov_rows: usize,
        /// Covariance column count.
        cov_cols: usize,
    },

    /// Degrees of freedom must be positive.
    #[error("invalid degrees of freedom: {0}")]
    InvalidDegreesOfFreedom(f64),
}

/// Draws correlated multivariate samples via a Cholesky factor.
///
/// A sample is `mean + L * z` with `z` i.i.d. standard normal and
/// `L * L^T` the covariance matrix. Student-t samples additionally scale
/// the correlated draw by `sqrt(df / chi2(df))`.
#[derive(Debug, Clone)]
pub struct CorrelatedSampler {
    mean: DVector<f64>,
    factor: DMatrix<f64>,
}

impl CorrelatedSampler {
    /// Fits a sampler to a mean vector and covariance matrix.
    ///
    /// Sample covariance estimates can be numerically semi-definite; a
    /// single retry adds diagonal jitter proportional to the trace before
    /// giving up.
    pub fn new(mean: DVector<f64>, covariance: DMatrix<f64>) -> Result<Self, SimulationError> {
        let n = mean.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(SimulationError::DimensionMismatch {
                mean_len: n,
                cov_rows: covariance.nrows(),
                cov_cols: covariance.ncols(),
            });
        }

        let factor = match covariance.clone().cholesky() {
            Some(chol) => chol.l(),
            None => {
                let jitter = covariance.trace() / n as f64 * 1e-10;
                let jittered = covariance + DMatrix::identity(n, n) * jitter;
                jittered
                    .cholesky()
                    .ok_or(SimulationError::NotPositiveDefinite)?
                    .l()
            }
        };

        Ok(Self { mean, factor })
    }

    /// Number of dimensions per sample.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Draws one multivariate normal sample.
    pub fn sample_normal<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        let z = DVector::from_iterator(
            self.dimension(),
            (0..self.dimension()).map(|_| StandardNormal.sample(rng)),
        );
        &self.mean + &self.factor * z
    }

    /// Draws `count` multivariate normal samples.
    pub fn sample_normal_batch<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Vec<DVector<f64>> {
        (0..count).map(|_| self.sample_normal(rng)).collect()
    }

    /// Draws `count` multivariate Student-t samples with `df` degrees of
    /// freedom (correlated normal draw scaled by `sqrt(df / chi2(df))`).
    pub fn sample_student_t_batch<R: Rng + ?Sized>(
        &self,
        df: f64,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<DVector<f64>>, SimulationError> {
        let chi2 =
            ChiSquared::new(df).map_err(|_| SimulationError::InvalidDegreesOfFreedom(df))?;

        Ok((0..count)
            .map(|_| {
                let z = DVector::from_iterator(
                    self.dimension(),
                    (0..self.dimension()).map(|_| StandardNormal.sample(rng)),
                );
                let w: f64 = chi2.sample(rng);
                &self.mean + (&self.factor * z) * (df / w).sqrt()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sampler_2d(rho: f64) -> CorrelatedSampler {
        let mean = DVector::from_column_slice(&[0.001, -0.002]);
        let cov = DMatrix::from_row_slice(
            2,
            2,
            &[0.0001, rho * 0.0001, rho * 0.0001, 0.0001],
        );
        CorrelatedSampler::new(mean, cov).unwrap()
    }

    #[test]
    fn test_identity_factor() {
        let sampler = CorrelatedSampler::new(
            DVector::zeros(2),
            DMatrix::identity(2, 2),
        )
        .unwrap();
        assert_relative_eq!(sampler.factor[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sampler.factor[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sampler.factor[(1, 0)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = CorrelatedSampler::new(DVector::zeros(3), DMatrix::identity(2, 2));
        assert!(matches!(
            result,
            Err(SimulationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_sample_moments_recovered() {
        let sampler = sampler_2d(0.5);
        let mut rng = StdRng::seed_from_u64(7);
        let samples = sampler.sample_normal_batch(50_000, &mut rng);

        let mean0: f64 = samples.iter().map(|s| s[0]).sum::<f64>() / samples.len() as f64;
        assert_relative_eq!(mean0, 0.001, epsilon = 3e-4);

        // Empirical correlation should be near the configured 0.5.
        let mean1: f64 = samples.iter().map(|s| s[1]).sum::<f64>() / samples.len() as f64;
        let (mut v0, mut v1, mut cov) = (0.0, 0.0, 0.0);
        for s in &samples {
            v0 += (s[0] - mean0).powi(2);
            v1 += (s[1] - mean1).powi(2);
            cov += (s[0] - mean0) * (s[1] - mean1);
        }
        let corr = cov / (v0.sqrt() * v1.sqrt());
        assert_relative_eq!(corr, 0.5, epsilon = 0.03);
    }

    #[test]
    fn test_student_t_fatter_tails() {
        let sampler = sampler_2d(0.0);
        let mut rng = StdRng::seed_from_u64(11);
        let normal = sampler.sample_normal_batch(20_000, &mut rng);
        let t = sampler.sample_student_t_batch(5.0, 20_000, &mut rng).unwrap();

        let extreme = |xs: &[DVector<f64>]| {
            xs.iter().filter(|s| s[0].abs() > 0.03).count() as f64 / xs.len() as f64
        };
        assert!(extreme(&t) > extreme(&normal));
    }

    #[test]
    fn test_invalid_degrees_of_freedom() {
        let sampler = sampler_2d(0.0);
        let mut rng = StdRng::seed_from_u64(1);
        let result = sampler.sample_student_t_batch(0.0, 10, &mut rng);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidDegreesOfFreedom(_))
        ));
    }
}
