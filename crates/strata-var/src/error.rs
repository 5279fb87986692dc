//! Error types for risk calculations.

use strata_core::{ReturnsError, SimulationError};
use thiserror::Error;

/// Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculations.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Calculation invoked before return data was configured.
    #[error("returns data not set: call set_returns() first")]
    ReturnsNotSet,

    /// Invalid input parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown simulation method.
    #[error("unsupported simulation method: {0}")]
    UnsupportedMethod(String),

    /// Declared but unbuilt simulation variant.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Error in the underlying return data.
    #[error("returns data error: {0}")]
    Returns(#[from] ReturnsError),

    /// Numerical failure during simulation.
    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RiskError::InvalidInput("time horizon must be at least 1 day".to_string());
        assert!(err.to_string().contains("time horizon"));

        let err = RiskError::ReturnsNotSet;
        assert!(err.to_string().contains("set_returns"));
    }
}
