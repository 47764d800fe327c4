use std::cmp::Ordering;

use crate::models::analytics::{ItemMetrics, PortfolioRow, PortfolioSummary, PortfolioView};
use crate::models::item::PortfolioItem;
use crate::models::settings::{Settings, SortDirection, SortKey};

/// A per-item value to order by.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (a, b) => compare_text(&a.as_text(), &b.as_text()),
        }
    }

    fn as_text(&self) -> String {
        match self {
            SortValue::Text(s) => s.clone(),
            SortValue::Number(n) => n.to_string(),
        }
    }
}

/// Case-insensitive first, then by raw text so "a" and "A" still have a
/// fixed order.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Derives every reporting figure from the item collection.
///
/// Pure business logic, no I/O.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Items whose name, language or notes contain `term`, ignoring case.
    /// A blank term matches everything.
    pub fn filter_items<'a>(&self, items: &'a [PortfolioItem], term: &str) -> Vec<&'a PortfolioItem> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return items.iter().collect();
        }
        items
            .iter()
            .filter(|it| it.matches_lowercase(&needle))
            .collect()
    }

    pub fn sort_value(&self, item: &PortfolioItem, key: SortKey) -> SortValue {
        match key {
            SortKey::Name => SortValue::Text(item.name.to_lowercase()),
            SortKey::PurchaseDate => SortValue::Text(item.purchase_date.clone()),
            SortKey::Quantity => SortValue::Number(f64::from(item.quantity)),
            SortKey::PricePaid => SortValue::Number(item.unit_paid()),
            SortKey::MarketPrice => SortValue::Number(item.unit_market()),
            SortKey::Invested => SortValue::Number(item.invested()),
            SortKey::MarketTotal => SortValue::Number(item.market_total()),
            SortKey::ProfitLoss => SortValue::Number(item.profit_loss()),
        }
    }

    /// Stable sort: items with equal keys keep their relative order in
    /// both directions.
    pub fn sort_items(&self, items: &mut [&PortfolioItem], key: SortKey, direction: SortDirection) {
        let mut keyed: Vec<(SortValue, &PortfolioItem)> = items
            .iter()
            .map(|it| (self.sort_value(it, key), *it))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ord = a.compare(b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        for (slot, (_, item)) in items.iter_mut().zip(keyed) {
            *slot = item;
        }
    }

    pub fn item_metrics(&self, item: &PortfolioItem) -> ItemMetrics {
        let profit_loss = item.profit_loss();
        ItemMetrics {
            invested: item.invested(),
            market_value: item.market_total(),
            profit_loss,
            is_positive: profit_loss >= 0.0,
            has_market: item.has_market_price(),
        }
    }

    /// Totals and per-unit averages. Averages are 0 for zero total quantity.
    pub fn summarize<'a, I>(&self, items: I) -> PortfolioSummary
    where
        I: IntoIterator<Item = &'a PortfolioItem>,
    {
        let (total_quantity, total_invested, total_estimated) = items.into_iter().fold(
            (0u64, 0.0, 0.0),
            |(qty, invested, estimated), it| {
                (
                    qty + u64::from(it.quantity),
                    invested + it.invested(),
                    estimated + it.market_total(),
                )
            },
        );

        let per_unit = |total: f64| {
            if total_quantity > 0 {
                total / total_quantity as f64
            } else {
                0.0
            }
        };

        PortfolioSummary {
            total_quantity,
            total_invested,
            total_estimated,
            total_profit_loss: total_estimated - total_invested,
            average_paid: per_unit(total_invested),
            average_market: per_unit(total_estimated),
        }
    }

    /// Filter by `search_term`, order by the settings, and summarize the
    /// rows that remain.
    pub fn build_view<'a>(
        &self,
        items: &'a [PortfolioItem],
        settings: &Settings,
        search_term: &str,
    ) -> PortfolioView<'a> {
        let mut filtered = self.filter_items(items, search_term);
        self.sort_items(&mut filtered, settings.sort_by, settings.sort_dir);

        let summary = self.summarize(filtered.iter().copied());
        let rows = filtered
            .into_iter()
            .map(|item| PortfolioRow {
                item,
                metrics: self.item_metrics(item),
            })
            .collect();

        PortfolioView { rows, summary }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
