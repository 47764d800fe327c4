use serde::{Deserialize, Serialize};

use super::item::PortfolioItem;

/// Derived display figures for a single lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetrics {
    /// quantity × price paid
    pub invested: f64,

    /// quantity × market price
    pub market_value: f64,

    /// quantity × (market price − price paid)
    pub profit_loss: f64,

    /// `profit_loss >= 0`
    pub is_positive: bool,

    /// False when no market price is known; the frontend shows "-" then.
    pub has_market: bool,
}

/// One table row: the item plus its derived figures.
#[derive(Debug, Clone)]
pub struct PortfolioRow<'a> {
    pub item: &'a PortfolioItem,
    pub metrics: ItemMetrics,
}

/// Totals over a (filtered) set of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of quantities
    pub total_quantity: u64,

    /// Sum of quantity × price paid
    pub total_invested: f64,

    /// Sum of quantity × market price
    pub total_estimated: f64,

    /// `total_estimated - total_invested`
    pub total_profit_loss: f64,

    /// `total_invested / total_quantity`, 0 for an empty set
    pub average_paid: f64,

    /// `total_estimated / total_quantity`, 0 for an empty set
    pub average_market: f64,
}

/// Filtered, sorted rows with the summary of exactly those rows.
#[derive(Debug, Clone)]
pub struct PortfolioView<'a> {
    pub rows: Vec<PortfolioRow<'a>>,
    pub summary: PortfolioSummary,
}
