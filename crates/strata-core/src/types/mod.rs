//! Core portfolio types.
//!
//! - [`PortfolioPosition`] - a single valued position
//! - [`PortfolioSnapshot`] - an ordered collection of positions
//! - [`SnapshotBuilder`] - fluent snapshot construction
//! - [`StressInfo`] - annotation stamped by the stress applier

mod builder;
mod position;
mod snapshot;

pub use builder::SnapshotBuilder;
pub use position::PortfolioPosition;
pub use snapshot::{PortfolioSnapshot, StressInfo};
