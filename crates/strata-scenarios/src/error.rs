//! Error types for scenario operations.

use strata_core::SimulationError;
use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur during scenario construction, persistence and
/// application.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Lookup of an unregistered predefined scenario.
    #[error("Unknown predefined scenario: {name}")]
    UnknownScenario {
        /// The requested scenario name.
        name: String,
    },

    /// A named scenario is not present in the store.
    #[error("Scenario '{name}' not found in store")]
    NotFound {
        /// The requested scenario name.
        name: String,
    },

    /// Historical window too short, or similar data shortage.
    #[error("Insufficient data: {reason}")]
    InsufficientData {
        /// Why the data is insufficient.
        reason: String,
    },

    /// Malformed input (weights mismatch, non-finite shock, bad name).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input is invalid.
        reason: String,
    },

    /// Filesystem failure in the scenario store.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Numerical failure during Monte Carlo generation.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

impl ScenarioError {
    /// Create an unknown scenario error.
    #[must_use]
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownScenario { name: name.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an insufficient data error.
    #[must_use]
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
