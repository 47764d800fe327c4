use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::storage::backend::store_file_stem;

/// Minimum time between two bulk refreshes: 30 minutes.
pub const DEFAULT_COOLDOWN_MS: i64 = 30 * 60 * 1000;

/// Runtime configuration of the tracker.
///
/// Every field has a default, so a config file only needs the values it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL of the catalog proxy (no trailing slash needed).
    pub api_base_url: String,

    /// Minimum gap between bulk refreshes.
    pub cooldown_ms: i64,

    /// How long a cached product detail counts as fresh.
    pub cache_ttl_ms: i64,

    /// Searches shorter than this return nothing without a request.
    pub search_min_chars: usize,

    /// Number of hits requested for autocomplete suggestions.
    pub suggestion_limit: usize,

    /// HTTP timeout for catalog requests (native only).
    pub request_timeout_secs: u64,

    pub items_key: String,
    pub settings_key: String,
    pub cache_key: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            cache_ttl_ms: crate::models::cache::CACHE_TTL_MS,
            search_min_chars: 3,
            suggestion_limit: 10,
            request_timeout_secs: 30,
            items_key: "sealedPokemonPortfolio:v1".to_string(),
            settings_key: "sealedPokemonPortfolio:settings".to_string(),
            cache_key: "sealedPokemonPortfolio:apiCache:v1".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Parse a JSON config, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cooldown_ms < 0 || self.cache_ttl_ms < 0 {
            return Err(CoreError::Config(
                "cooldown_ms and cache_ttl_ms must not be negative".into(),
            ));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(CoreError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        let keys = [&self.items_key, &self.settings_key, &self.cache_key];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(CoreError::Config("store keys must not be empty".into()));
        }
        // Compared as file stems: a directory store maps `a:b` and `a_b` to
        // the same file.
        let [items, settings, cache] = keys.map(|k| store_file_stem(k));
        if items == settings || items == cache || settings == cache {
            return Err(CoreError::Config(
                "store keys must be distinct once mapped to file names".into(),
            ));
        }
        Ok(())
    }
}
