use log::{debug, warn};

use crate::config::TrackerConfig;
use crate::models::item::{PortfolioItem, CATALOG_SOURCE};
use crate::models::lenient::sanitize_amount;
use crate::models::product::{ProductSuggestion, RawProduct};
use crate::providers::traits::ProductCatalog;
use super::normalizer::{normalize_product, price_block, unwrap_detail};
use super::price_resolver::price_for_language;

/// Currency assumed when the catalog's price block names none.
const DEFAULT_PRICE_CURRENCY: &str = "EUR";

/// Silent-failure front of the product catalog.
///
/// Every catalog error is logged and turned into "no data" (empty list or
/// `None`), so callers never see transport problems.
pub struct CatalogService {
    catalog: Box<dyn ProductCatalog>,
    min_query_chars: usize,
    suggestion_limit: usize,
}

impl CatalogService {
    pub fn new(catalog: Box<dyn ProductCatalog>) -> Self {
        Self::from_config(catalog, &TrackerConfig::default())
    }

    pub fn from_config(catalog: Box<dyn ProductCatalog>, config: &TrackerConfig) -> Self {
        Self {
            catalog,
            min_query_chars: config.search_min_chars,
            suggestion_limit: config.suggestion_limit,
        }
    }

    pub fn catalog_name(&self) -> &str {
        self.catalog.name()
    }

    /// Search the catalog. Queries shorter than the minimum length return
    /// nothing without a request.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<RawProduct> {
        let query = query.trim();
        if query.chars().count() < self.min_query_chars {
            return Vec::new();
        }
        match self.catalog.search_products(query, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Catalog search via {} failed: {e}", self.catalog.name());
                Vec::new()
            }
        }
    }

    /// Fetch and unwrap the detail record for a catalog id.
    pub async fn fetch_detail(&self, id: &str) -> Option<RawProduct> {
        match self.catalog.fetch_product_detail(id).await {
            Ok(Some(detail)) => unwrap_detail(detail),
            Ok(None) => {
                debug!("Catalog has no detail for {id}");
                None
            }
            Err(e) => {
                warn!("Detail fetch for {id} via {} failed: {e}", self.catalog.name());
                None
            }
        }
    }

    /// Autocomplete suggestions with the price resolved for `language`.
    pub async fn suggestions(&self, query: &str, language: &str) -> Vec<ProductSuggestion> {
        self.search(query, self.suggestion_limit)
            .await
            .iter()
            .map(|raw| {
                let block = price_block(raw);
                ProductSuggestion {
                    product: normalize_product(raw),
                    price: price_for_language(block.as_ref(), language),
                    currency: block
                        .and_then(|b| b.currency)
                        .unwrap_or_else(|| DEFAULT_PRICE_CURRENCY.to_string()),
                }
            })
            .collect()
    }

    /// Fill in catalog data for an item that is about to be saved.
    ///
    /// 1. With a catalog id: fetch the detail, fill a missing image and
    ///    Cardmarket link, and take the market price for the item language.
    /// 2. If the id, image or market price is still missing and the item has
    ///    a name, search by name and adopt the best hit the same way.
    ///
    /// Failures leave the item as it was.
    pub async fn enrich_item(&self, item: &mut PortfolioItem) {
        if let Some(id) = item.catalog_id().map(str::to_string) {
            if let Some(detail) = self.fetch_detail(&id).await {
                let product = normalize_product(&detail);
                if item.image_url.is_none() {
                    item.image_url = product.image;
                }
                if item.cardmarket_url.is_none() {
                    item.cardmarket_url = product.cm_link;
                }
                if let Some(price) = price_for_language(price_block(&detail).as_ref(), &item.language) {
                    item.market_price = sanitize_amount(price);
                }
            }
        }

        let incomplete = item.catalog_id().is_none()
            || item.image_url.is_none()
            || !item.has_market_price();
        if incomplete && !item.name.trim().is_empty() {
            let name = item.name.trim().to_string();
            if let Some(hit) = self.search(&name, 1).await.into_iter().next() {
                let product = normalize_product(&hit);
                if product.id.is_some() {
                    item.api_id = product.id;
                }
                if product.image.is_some() {
                    item.image_url = product.image;
                }
                if item.cardmarket_url.is_none() {
                    item.cardmarket_url = product.cm_link;
                }
                if let Some(price) = price_for_language(price_block(&hit).as_ref(), &item.language) {
                    item.market_price = sanitize_amount(price);
                }
            }
        }

        item.api_source = item.catalog_id().map(|_| CATALOG_SOURCE.to_string());
    }
}
