//! Snapshot builder for fluent construction.

use super::{PortfolioPosition, PortfolioSnapshot};

/// Builder for constructing a [`PortfolioSnapshot`].
///
/// # Example
///
/// ```rust,ignore
/// use strata_core::prelude::*;
///
/// let snapshot = PortfolioSnapshot::builder("Growth Book")
///     .add_position(PortfolioPosition::new(
///         "Apple Inc.", "AAPL", dec!(100), dec!(150), "Equity", "USD",
///     ))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    name: String,
    positions: Vec<PortfolioPosition>,
}

impl SnapshotBuilder {
    /// Creates a new snapshot builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positions: Vec::new(),
        }
    }

    /// Adds a position to the snapshot.
    #[must_use]
    pub fn add_position(mut self, position: PortfolioPosition) -> Self {
        self.positions.push(position);
        self
    }

    /// Adds multiple positions to the snapshot.
    #[must_use]
    pub fn add_positions(mut self, positions: impl IntoIterator<Item = PortfolioPosition>) -> Self {
        self.positions.extend(positions);
        self
    }

    /// Builds the snapshot, computing weights from market values.
    #[must_use]
    pub fn build(self) -> PortfolioSnapshot {
        PortfolioSnapshot::new(self.name, self.positions)
    }
}
