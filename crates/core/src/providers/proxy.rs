use async_trait::async_trait;
use log::warn;
use reqwest::{Client, Url};
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::config::TrackerConfig;
use crate::errors::CoreError;
use crate::models::product::RawProduct;
use super::traits::ProductCatalog;

const PROVIDER_NAME: &str = "CatalogProxy";

/// Keys checked, in order, when a search response wraps its hits in an object.
const LIST_KEYS: [&str; 6] = ["results", "data", "list", "items", "products", "cards"];

/// Product catalog reached through the tracker's backend proxy.
///
/// - **Search**: `GET {base}/api/products/search?q={query}&limit={n}`
/// - **Detail**: `GET {base}/api/products/{id}`
///
/// The proxy forwards to the upstream TCG API and keeps the API key out of
/// the client. Response shapes are not stable, so bodies are handled as
/// untyped JSON.
pub struct ProxyCatalogProvider {
    client: Client,
    base_url: String,
}

impl ProxyCatalogProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, 30)
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::with_timeout(config.api_base_url.clone(), config.request_timeout_secs)
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid base URL '{}': {e}", self.base_url),
        })?;
        url.path_segments_mut()
            .map_err(|_| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Base URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the search endpoint. The query is form-encoded.
    pub fn search_url(&self, query: &str, limit: usize) -> Result<Url, CoreError> {
        let mut url = self.endpoint(&["api", "products", "search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// URL of the detail endpoint. The id is percent-encoded as one path segment.
    pub fn detail_url(&self, id: &str) -> Result<Url, CoreError> {
        self.endpoint(&["api", "products", id])
    }
}

/// Reduce a search response of unknown shape to a list of records.
///
/// Accepts a bare array, an object holding the list under one of the
/// usual keys, `{ results: { data: [...] } }`, or failing that the first
/// array-valued property. Anything else yields an empty list.
pub fn extract_array(data: Value) -> Vec<Value> {
    let mut obj = match data {
        Value::Array(items) => return items,
        Value::Object(obj) => obj,
        _ => return Vec::new(),
    };

    for key in LIST_KEYS {
        if matches!(obj.get(key), Some(Value::Array(_))) {
            if let Some(Value::Array(items)) = obj.remove(key) {
                return items;
            }
        }
    }

    if let Some(Value::Array(items)) = obj
        .get_mut("results")
        .and_then(|r| r.as_object_mut())
        .and_then(|r| r.remove("data"))
    {
        return items;
    }

    obj.into_iter()
        .find_map(|(_, v)| match v {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProductCatalog for ProxyCatalogProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawProduct>, CoreError> {
        let url = self.search_url(query, limit)?;
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Catalog search failed with status {status}");
            return Ok(Vec::new());
        }

        let data: Value = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse search response: {e}"),
        })?;

        Ok(extract_array(data))
    }

    async fn fetch_product_detail(&self, id: &str) -> Result<Option<RawProduct>, CoreError> {
        let url = self.detail_url(id)?;
        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            return Ok(None);
        }

        Ok(resp.json::<Value>().await.ok())
    }
}
