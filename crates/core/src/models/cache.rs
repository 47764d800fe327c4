use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::lenient::de_opt_timestamp;
use super::product::RawProduct;

/// How long a fetched product detail stays fresh: 30 minutes.
pub const CACHE_TTL_MS: i64 = 30 * 60 * 1000;

/// A fetched product detail together with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub data: RawProduct,

    /// Milliseconds since the Unix epoch. Missing values count as 0 (stale).
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub fetched_at: Option<i64>,
}

impl CacheEntry {
    /// Fresh iff `now - fetched_at < 30 min`.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.is_fresh_within(now_ms, CACHE_TTL_MS)
    }

    pub fn is_fresh_within(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.fetched_at.unwrap_or(0)) < ttl_ms
    }
}

/// Local cache of catalog product details, keyed by catalog id.
///
/// Persisted as a flat JSON object so it survives restarts. There is no
/// size bound; an entry is only ever replaced by a newer fetch of the
/// same id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCache {
    entries: HashMap<String, CacheEntry>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Store `data` under `key`, stamped with `now_ms`.
    pub fn put(&mut self, key: impl Into<String>, data: RawProduct, now_ms: i64) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data,
                fetched_at: Some(now_ms),
            },
        );
    }

    /// The cached record for `key` if it is still within `ttl_ms`.
    pub fn get_fresh(&self, key: &str, now_ms: i64, ttl_ms: i64) -> Option<&RawProduct> {
        self.entries
            .get(key)
            .filter(|e| e.is_fresh_within(now_ms, ttl_ms))
            .map(|e| &e.data)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
