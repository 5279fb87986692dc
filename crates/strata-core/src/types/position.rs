//! Portfolio position representation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single position in a portfolio.
///
/// Monetary fields use [`Decimal`]; the `weight` is an analytic quantity
/// recomputed at snapshot level and therefore an `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    /// Security display name (e.g., "Apple Inc.").
    pub security: String,

    /// Asset identifier / ticker.
    pub ticker: String,

    /// Number of units held.
    pub quantity: Decimal,

    /// Unit price.
    pub price: Decimal,

    /// Market value (quantity x price).
    pub market_value: Decimal,

    /// Weight in the portfolio (market value / total market value).
    pub weight: f64,

    /// Asset class label (e.g., "Equity", "Sovereign", "Commodity").
    pub asset_class: String,

    /// Currency code (e.g., "USD").
    pub currency: String,

    /// Optional sector label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl PortfolioPosition {
    /// Creates a position; market value is derived as quantity x price.
    ///
    /// The weight is left at zero until the owning snapshot recomputes it.
    #[must_use]
    pub fn new(
        security: impl Into<String>,
        ticker: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
        asset_class: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            security: security.into(),
            ticker: ticker.into(),
            quantity,
            price,
            market_value: quantity * price,
            weight: 0.0,
            asset_class: asset_class.into(),
            currency: currency.into(),
            sector: None,
        }
    }

    /// Sets the sector label.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Overrides the market value (for loaders that carry it explicitly).
    #[must_use]
    pub fn with_market_value(mut self, market_value: Decimal) -> Self {
        self.market_value = market_value;
        self
    }

    /// Market value as `f64` for analytic use.
    #[must_use]
    pub fn market_value_f64(&self) -> f64 {
        self.market_value.to_f64().unwrap_or(0.0)
    }
}
