use chrono::{DateTime, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::models::chart::{ChartData, RankedValue, TimeSeries};
use crate::models::item::PortfolioItem;

/// Number of bars/slices shown in the ranking charts.
pub const TOP_N: usize = 6;

/// Group label for items without a language.
pub const OTHER_LANGUAGE: &str = "Other";

/// Bar label for items without a name.
pub const UNNAMED_ITEM: &str = "Item";

/// Purchase month (`YYYY-MM`) of an item date, or `None` if it does not parse.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and bare `YYYY-MM`.
pub fn month_key(date: &str) -> Option<String> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d").ok())?;
    Some(parsed.format("%Y-%m").to_string())
}

/// Generates chart-ready data sets from the item collection.
///
/// Always works on the full collection, independent of the table filter.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Running totals of invested and estimated value per purchase month.
    ///
    /// Items without a parseable purchase date are left out.
    pub fn time_series(&self, items: &[PortfolioItem]) -> TimeSeries {
        let mut per_month: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for item in items {
            let Some(key) = month_key(&item.purchase_date) else {
                continue;
            };
            let entry = per_month.entry(key).or_insert((0.0, 0.0));
            entry.0 += item.invested();
            entry.1 += item.market_total();
        }

        let (series, _) = per_month.into_iter().fold(
            (TimeSeries::default(), (0.0, 0.0)),
            |(mut series, (invested, estimated)), (label, (month_invested, month_estimated))| {
                let running = (invested + month_invested, estimated + month_estimated);
                series.labels.push(label);
                series.invested.push(running.0);
                series.estimated.push(running.1);
                (series, running)
            },
        );
        series
    }

    /// The `n` largest lots by market total, largest first.
    pub fn top_holdings(&self, items: &[PortfolioItem], n: usize) -> Vec<RankedValue> {
        let ranked = items
            .iter()
            .map(|it| RankedValue {
                label: if it.name.is_empty() {
                    UNNAMED_ITEM.to_string()
                } else {
                    it.name.clone()
                },
                value: it.market_total(),
            })
            .collect();
        take_largest(ranked, n)
    }

    /// Market total per language, the `n` largest groups first.
    pub fn by_language(&self, items: &[PortfolioItem], n: usize) -> Vec<RankedValue> {
        let mut groups: Vec<RankedValue> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for item in items {
            let label = if item.language.is_empty() {
                OTHER_LANGUAGE
            } else {
                item.language.as_str()
            };
            let slot = *index.entry(label.to_string()).or_insert_with(|| {
                groups.push(RankedValue {
                    label: label.to_string(),
                    value: 0.0,
                });
                groups.len() - 1
            });
            groups[slot].value += item.market_total();
        }

        take_largest(groups, n)
    }

    pub fn chart_data(&self, items: &[PortfolioItem]) -> ChartData {
        ChartData {
            time_series: self.time_series(items),
            top_holdings: self.top_holdings(items, TOP_N),
            by_language: self.by_language(items, TOP_N),
        }
    }
}

/// Stable descending sort by value, truncated to `n`.
fn take_largest(mut values: Vec<RankedValue>, n: usize) -> Vec<RankedValue> {
    values.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    values.truncate(n);
    values
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
