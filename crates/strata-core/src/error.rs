//! Error types for return preparation.
//!
//! This module defines the error types used when turning price history
//! into a return matrix.

use thiserror::Error;

/// Result type for return preparation.
pub type ReturnsResult<T> = Result<T, ReturnsError>;

/// Errors that can occur while preparing returns from price history.
#[derive(Error, Debug, Clone)]
pub enum ReturnsError {
    /// Two price records for the same (date, ticker) pair.
    #[error("Duplicate observation for {ticker} on {date}")]
    DuplicateObservation {
        /// The asset ticker.
        ticker: String,
        /// The observation date (ISO format).
        date: String,
    },

    /// Not enough observations to compute returns.
    #[error("Insufficient data: {reason}")]
    InsufficientData {
        /// Why the data is insufficient.
        reason: String,
    },

    /// Unknown return calculation method.
    #[error("Unsupported return method: {0}")]
    UnsupportedMethod(String),

    /// Unknown resampling frequency.
    #[error("Unsupported return frequency: {0}")]
    UnsupportedFrequency(String),

    /// Malformed tabular input.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input is invalid.
        reason: String,
    },
}

impl ReturnsError {
    /// Create a duplicate observation error.
    #[must_use]
    pub fn duplicate(ticker: impl Into<String>, date: impl ToString) -> Self {
        Self::DuplicateObservation {
            ticker: ticker.into(),
            date: date.to_string(),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReturnsError::duplicate("AAPL", "2024-01-02");
        assert!(err.to_string().contains("AAPL"));
        assert!(err.to_string().contains("2024-01-02"));

        let err = ReturnsError::insufficient("only one price row");
        assert!(err.to_string().contains("only one price row"));

        let err = ReturnsError::UnsupportedMethod("geometric".to_string());
        assert!(err.to_string().contains("geometric"));
    }
}
