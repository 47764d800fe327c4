use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::models::cache::{ProductCache, CACHE_TTL_MS};
use crate::models::item::PortfolioItem;
use crate::models::product::RawProduct;
use super::catalog_service::CatalogService;
use super::normalizer::{normalize_product, price_block};
use super::price_resolver::price_for_language;

/// What a bulk refresh did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// True when at least one item changed; the caller should persist items.
    pub changed: bool,

    /// Number of items whose image, link or market price changed.
    pub updated: usize,

    /// Details fetched live from the catalog (and written to the cache).
    pub fetched: usize,

    /// Items served from a fresh cache entry.
    pub cache_hits: usize,

    /// Catalog ids whose detail could not be fetched.
    pub failed: Vec<String>,

    /// Items without a catalog id.
    pub skipped: usize,
}

impl RefreshOutcome {
    /// True when the cache received new entries and should be persisted.
    pub fn cache_changed(&self) -> bool {
        self.fetched > 0
    }
}

/// Reconciles item market data against the catalog.
///
/// Cache strategy:
/// - **Fresh entry** (younger than the TTL): used as-is, no request.
/// - **Stale or missing**: fetched live, stored in the cache even if the
///   item ends up unchanged.
/// - **Fetch failure**: the item is left alone; the batch carries on.
pub struct RefreshService {
    cache_ttl_ms: i64,
}

impl RefreshService {
    pub fn new() -> Self {
        Self {
            cache_ttl_ms: CACHE_TTL_MS,
        }
    }

    pub fn with_ttl(cache_ttl_ms: i64) -> Self {
        Self { cache_ttl_ms }
    }

    /// Refresh every item that has a catalog id, one after the other.
    ///
    /// Items are mutated in place. Work already done is kept if a later
    /// item fails.
    pub async fn refresh_all(
        &self,
        catalog: &CatalogService,
        items: &mut [PortfolioItem],
        cache: &mut ProductCache,
        clock: &dyn Clock,
    ) -> RefreshOutcome {
        self.refresh_all_with(catalog, items, cache, clock, |_| {}).await
    }

    /// Like [`refresh_all`](Self::refresh_all), calling `on_cache_put` with
    /// the whole cache right after each live fetch is stored in it.
    pub async fn refresh_all_with<F>(
        &self,
        catalog: &CatalogService,
        items: &mut [PortfolioItem],
        cache: &mut ProductCache,
        clock: &dyn Clock,
        mut on_cache_put: F,
    ) -> RefreshOutcome
    where
        F: FnMut(&ProductCache) + Send,
    {
        let mut outcome = RefreshOutcome::default();

        for item in items.iter_mut() {
            let Some(key) = item.catalog_id().map(str::to_string) else {
                outcome.skipped += 1;
                continue;
            };

            let raw = match cache.get_fresh(&key, clock.now_ms(), self.cache_ttl_ms) {
                Some(cached) => {
                    outcome.cache_hits += 1;
                    cached.clone()
                }
                None => match catalog.fetch_detail(&key).await {
                    Some(detail) => {
                        cache.put(key.clone(), detail.clone(), clock.now_ms());
                        on_cache_put(cache);
                        outcome.fetched += 1;
                        detail
                    }
                    None => {
                        debug!("Skipping {key}: no catalog detail");
                        outcome.failed.push(key);
                        continue;
                    }
                },
            };

            if Self::apply_product(item, &raw, clock.now_ms()) {
                outcome.updated += 1;
                outcome.changed = true;
            }
        }

        info!(
            "Market refresh: {} updated, {} fetched, {} cached, {} failed, {} without id",
            outcome.updated,
            outcome.fetched,
            outcome.cache_hits,
            outcome.failed.len(),
            outcome.skipped
        );
        outcome
    }

    /// Copy image, Cardmarket link and language price from a catalog record
    /// onto `item`. Only values that differ are written; `market_updated_at`
    /// is stamped only if something changed. Returns whether it did.
    pub fn apply_product(item: &mut PortfolioItem, raw: &RawProduct, now_ms: i64) -> bool {
        let product = normalize_product(raw);
        let block = price_block(raw);

        let new_image = product.image.or_else(|| item.image_url.clone());
        let new_link = product.cm_link.or_else(|| item.cardmarket_url.clone());
        let new_price =
            price_for_language(block.as_ref(), &item.language).unwrap_or(item.market_price);

        let mut changed = false;
        if new_image.is_some() && new_image != item.image_url {
            item.image_url = new_image;
            changed = true;
        }
        if new_link.is_some() && new_link != item.cardmarket_url {
            item.cardmarket_url = new_link;
            changed = true;
        }
        if new_price.is_finite() && new_price >= 0.0 && new_price != item.market_price {
            item.market_price = new_price;
            changed = true;
        }

        if changed {
            item.market_updated_at = Some(now_ms);
        }
        changed
    }
}

impl Default for RefreshService {
    fn default() -> Self {
        Self::new()
    }
}
