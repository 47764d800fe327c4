use serde::{Deserialize, Serialize};

/// Cumulative invested vs. estimated value by purchase month.
///
/// The three vectors are parallel: `invested[i]` and `estimated[i]` are
/// running totals up to and including month `labels[i]` (`YYYY-MM`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub invested: Vec<f64>,
    pub estimated: Vec<f64>,
}

/// A labelled value for bar/donut charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedValue {
    pub label: String,
    pub value: f64,
}

/// Everything the overview page draws.
///
/// The core computes every number; the frontend only renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub time_series: TimeSeries,
    /// Largest lots by market total
    pub top_holdings: Vec<RankedValue>,
    /// Market total per product language
    pub by_language: Vec<RankedValue>,
}
