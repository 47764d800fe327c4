pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use clock::{Clock, SystemClock};
use config::TrackerConfig;
use errors::CoreError;
use models::{
    analytics::{PortfolioSummary, PortfolioView},
    chart::ChartData,
    item::PortfolioItem,
    portfolio::Portfolio,
    product::{ProductSuggestion, RawProduct},
    settings::{Currency, Settings, SortDirection, SortKey, Theme},
};
use providers::traits::ProductCatalog;
use services::{
    analytics_service::AnalyticsService,
    cardmarket,
    catalog_service::CatalogService,
    chart_service::ChartService,
    cooldown::{self, RefreshAllowance},
    refresh_service::{RefreshOutcome, RefreshService},
};
use storage::{manager::StorageManager, transfer};

/// Result of asking for a bulk market refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefreshStatus {
    /// The refresh ran to the end of the item list.
    Completed(RefreshOutcome),
    /// Rejected: the previous refresh was too recent.
    CoolingDown { remaining_ms: u64 },
}

impl RefreshStatus {
    /// User-facing notice for a rejected refresh.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            RefreshStatus::Completed(_) => None,
            RefreshStatus::CoolingDown { remaining_ms } => Some(format!(
                "Please wait {} before refreshing again.",
                cooldown::format_remaining(*remaining_ms)
            )),
        }
    }
}

/// Main entry point for the sealed portfolio core library.
/// Holds the portfolio state and all services needed to operate on it.
///
/// When a [`StorageManager`] is attached, every mutation is written through
/// to the affected store immediately.
#[must_use]
pub struct PortfolioTracker {
    portfolio: Portfolio,
    config: TrackerConfig,
    storage: Option<StorageManager>,
    catalog_service: CatalogService,
    refresh_service: RefreshService,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("items", &self.portfolio.items.len())
            .field("settings", &self.portfolio.settings)
            .field("cached_products", &self.portfolio.cache.len())
            .field("persistent", &self.storage.is_some())
            .finish()
    }
}

impl PortfolioTracker {
    /// Empty in-memory tracker with default settings and the wall clock.
    pub fn create_new(catalog: Box<dyn ProductCatalog>) -> Self {
        Self::with_parts(TrackerConfig::default(), catalog, None, Arc::new(SystemClock))
    }

    /// Assemble a tracker. With storage attached, state is loaded from it
    /// (falling back to defaults for missing or malformed stores).
    pub fn with_parts(
        config: TrackerConfig,
        catalog: Box<dyn ProductCatalog>,
        storage: Option<StorageManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let portfolio = storage
            .as_ref()
            .map(StorageManager::load_portfolio)
            .unwrap_or_default();
        info!(
            "Loaded portfolio: {} items, {} cached products",
            portfolio.items.len(),
            portfolio.cache.len()
        );
        Self {
            portfolio,
            catalog_service: CatalogService::from_config(catalog, &config),
            refresh_service: RefreshService::with_ttl(config.cache_ttl_ms),
            analytics_service: AnalyticsService::new(),
            chart_service: ChartService::new(),
            storage,
            config,
            clock,
        }
    }

    /// Directory-backed tracker talking to the catalog proxy from `config`
    /// (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_dir(
        config: TrackerConfig,
        dir: impl Into<std::path::PathBuf>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let storage = StorageManager::open_dir(dir, &config)?;
        let catalog = providers::proxy::ProxyCatalogProvider::from_config(&config);
        Ok(Self::with_parts(
            config,
            Box::new(catalog),
            Some(storage),
            Arc::new(SystemClock),
        ))
    }

    // ── Persistence ─────────────────────────────────────────────────

    fn persist_items(&self) -> Result<(), CoreError> {
        match &self.storage {
            Some(storage) => storage.save_items(&self.portfolio.items),
            None => Ok(()),
        }
    }

    fn persist_settings(&self) -> Result<(), CoreError> {
        match &self.storage {
            Some(storage) => storage.save_settings(&self.portfolio.settings),
            None => Ok(()),
        }
    }

    fn persist_cache(&self) -> Result<(), CoreError> {
        match &self.storage {
            Some(storage) => storage.save_cache(&self.portfolio.cache),
            None => Ok(()),
        }
    }

    /// Write all three stores.
    pub fn save(&self) -> Result<(), CoreError> {
        match &self.storage {
            Some(storage) => storage.save_portfolio(&self.portfolio),
            None => Ok(()),
        }
    }

    // ── Items ───────────────────────────────────────────────────────

    #[must_use]
    pub fn items(&self) -> &[PortfolioItem] {
        &self.portfolio.items
    }

    #[must_use]
    pub fn get_item(&self, id: &str) -> Option<&PortfolioItem> {
        self.portfolio.find_item(id)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.portfolio.items.len()
    }

    fn validate_item(item: &PortfolioItem) -> Result<(), CoreError> {
        if item.id.trim().is_empty() {
            return Err(CoreError::ValidationError("Item id must not be empty".into()));
        }
        if item.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Item name must not be empty".into()));
        }
        if !item.price_paid.is_finite() || item.price_paid < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Price paid must be a non-negative number, got {}",
                item.price_paid
            )));
        }
        Ok(())
    }

    /// Insert a new item or replace the one with the same id.
    /// Returns the item id.
    pub fn save_item(&mut self, item: PortfolioItem) -> Result<String, CoreError> {
        Self::validate_item(&item)?;
        let id = item.id.clone();
        match self.portfolio.position(&id) {
            Some(idx) => self.portfolio.items[idx] = item,
            None => self.portfolio.items.push(item),
        }
        self.persist_items()?;
        Ok(id)
    }

    /// Fill in catalog data (id, image, link, language price), then save.
    pub async fn submit_item(&mut self, mut item: PortfolioItem) -> Result<String, CoreError> {
        Self::validate_item(&item)?;
        self.catalog_service.enrich_item(&mut item).await;
        self.save_item(item)
    }

    /// Replace an existing item. Fails if no item has that id.
    pub fn update_item(&mut self, item: PortfolioItem) -> Result<(), CoreError> {
        if self.portfolio.position(&item.id).is_none() {
            return Err(CoreError::ItemNotFound(item.id));
        }
        self.save_item(item).map(|_| ())
    }

    /// Delete an item by id and return it.
    pub fn remove_item(&mut self, id: &str) -> Result<PortfolioItem, CoreError> {
        let idx = self
            .portfolio
            .position(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        let removed = self.portfolio.items.remove(idx);
        self.persist_items()?;
        Ok(removed)
    }

    /// Cardmarket link for an item: its product page or a name search.
    #[must_use]
    pub fn cardmarket_link(&self, id: &str) -> Option<String> {
        self.get_item(id).map(cardmarket::link_for_item)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.portfolio.settings
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn set_currency(&mut self, currency: Currency) -> Result<(), CoreError> {
        self.portfolio.settings.currency = currency;
        self.persist_settings()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), CoreError> {
        self.portfolio.settings.theme = theme;
        self.persist_settings()
    }

    /// Switch between dark and light; returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, CoreError> {
        let theme = self.portfolio.settings.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) -> Result<(), CoreError> {
        self.portfolio.settings.sort_by = key;
        self.portfolio.settings.sort_dir = direction;
        self.persist_settings()
    }

    /// Format an amount in the display currency.
    #[must_use]
    pub fn format_money(&self, value: f64) -> String {
        self.portfolio.settings.currency.format(value)
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Raw catalog search; empty for short queries or on failure.
    pub async fn search_products(&self, query: &str, limit: usize) -> Vec<RawProduct> {
        self.catalog_service.search(query, limit).await
    }

    /// Autocomplete suggestions priced for `language`.
    pub async fn suggestions(&self, query: &str, language: &str) -> Vec<ProductSuggestion> {
        self.catalog_service.suggestions(query, language).await
    }

    // ── Market refresh ──────────────────────────────────────────────

    /// Whether a bulk refresh may start now.
    #[must_use]
    pub fn refresh_allowance(&self) -> RefreshAllowance {
        cooldown::can_refresh(
            &self.portfolio.settings,
            self.clock.now_ms(),
            self.config.cooldown_ms,
        )
    }

    /// Refresh market data of all items, unless the cooldown is active.
    ///
    /// The cache is saved after every live fetch, so entries survive an
    /// interrupted batch. On completion `last_refresh_at` is stamped and
    /// settings are saved; items are saved only if they changed. Every save
    /// is attempted before the first failure is reported.
    pub async fn refresh_market_data(&mut self) -> Result<RefreshStatus, CoreError> {
        let allowance = self.refresh_allowance();
        if !allowance.allowed {
            info!("Refresh rejected, {} ms of cooldown left", allowance.remaining_ms);
            return Ok(RefreshStatus::CoolingDown {
                remaining_ms: allowance.remaining_ms,
            });
        }

        let storage = &self.storage;
        let mut first_error: Option<CoreError> = None;
        let outcome = self
            .refresh_service
            .refresh_all_with(
                &self.catalog_service,
                &mut self.portfolio.items,
                &mut self.portfolio.cache,
                self.clock.as_ref(),
                |cache| {
                    let Some(storage) = storage else { return };
                    if let Err(e) = storage.save_cache(cache) {
                        warn!("Failed to save product cache: {e}");
                        first_error.get_or_insert(e);
                    }
                },
            )
            .await;

        self.portfolio.settings.last_refresh_at = Some(self.clock.now_ms());
        let items_saved = if outcome.changed {
            self.persist_items()
        } else {
            Ok(())
        };
        let settings_saved = self.persist_settings();

        match first_error {
            Some(e) => Err(e),
            None => items_saved.and(settings_saved).map(|()| RefreshStatus::Completed(outcome)),
        }
    }

    #[must_use]
    pub fn cached_product_count(&self) -> usize {
        self.portfolio.cache.len()
    }

    /// Drop every cached product detail.
    pub fn clear_cache(&mut self) -> Result<(), CoreError> {
        self.portfolio.cache.clear();
        self.persist_cache()
    }

    // ── Reporting ───────────────────────────────────────────────────

    /// Table rows filtered by `search_term` and sorted per settings, with
    /// their summary.
    #[must_use]
    pub fn view(&self, search_term: &str) -> PortfolioView<'_> {
        self.analytics_service
            .build_view(&self.portfolio.items, &self.portfolio.settings, search_term)
    }

    #[must_use]
    pub fn summary(&self, search_term: &str) -> PortfolioSummary {
        let filtered = self
            .analytics_service
            .filter_items(&self.portfolio.items, search_term);
        self.analytics_service.summarize(filtered)
    }

    /// Chart data over the full collection.
    #[must_use]
    pub fn charts(&self) -> ChartData {
        self.chart_service.chart_data(&self.portfolio.items)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// `{ settings, items }` as pretty JSON.
    pub fn export_json(&self) -> Result<String, CoreError> {
        transfer::export_json(&self.portfolio.settings, &self.portfolio.items)
    }

    /// Download name stamped with today's date.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        let today = chrono::DateTime::from_timestamp_millis(self.clock.now_ms())
            .unwrap_or_default()
            .date_naive();
        transfer::export_file_name(today)
    }

    /// Import a document (or legacy item array). Nothing changes if the
    /// input is invalid. Returns the number of items after import.
    pub fn import_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let imported = transfer::parse_import(json)?;
        imported.apply(&mut self.portfolio.items, &mut self.portfolio.settings);
        self.persist_items()?;
        self.persist_settings()?;
        Ok(self.portfolio.items.len())
    }
}
