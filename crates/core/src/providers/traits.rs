use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::product::RawProduct;

/// Abstraction over the external product catalog.
///
/// The concrete transport (HTTP proxy, fixture file, test mock) lives
/// behind this trait so the refresh and enrichment logic never depends on
/// it. Implementations report failures as `Err`; callers in `services`
/// turn them into "no data".
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ProductCatalog: Send + Sync {
    /// Human-readable name of this catalog (for logs/errors).
    fn name(&self) -> &str;

    /// Full-text product search, at most `limit` records.
    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawProduct>, CoreError>;

    /// Detail record for one catalog id. `Ok(None)` when the catalog has
    /// no usable answer (non-success status, unparseable body).
    async fn fetch_product_detail(&self, id: &str) -> Result<Option<RawProduct>, CoreError>;
}
