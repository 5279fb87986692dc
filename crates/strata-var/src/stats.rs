//! Scalar statistics helpers for the VaR engine.

/// Linear-interpolated percentile, numpy-style.
///
/// `pct` is in [0, 100]. The rank is `pct/100 * (n-1)`; values between
/// adjacent order statistics are interpolated linearly.
pub(crate) fn percentile(values: &[f64], pct: f64) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Arithmetic mean.
pub(crate) fn mean(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0).
///
/// The parametric path inherits the original model's moment convention:
/// population std for the portfolio return sample, sample covariance
/// (n-1) for the per-asset matrix.
pub(crate) fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
