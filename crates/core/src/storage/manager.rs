use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::TrackerConfig;
use crate::errors::CoreError;
use crate::models::cache::ProductCache;
use crate::models::item::{assign_unique_ids, PortfolioItem};
use crate::models::portfolio::Portfolio;
use crate::models::settings::Settings;

use super::backend::StoreBackend;

/// Load and save the three independent stores: items, settings and the
/// product cache.
///
/// Loading never fails: a missing or malformed blob is logged and replaced
/// by the default value. Saving writes the whole blob.
pub struct StorageManager {
    backend: Box<dyn StoreBackend>,
    items_key: String,
    settings_key: String,
    cache_key: String,
}

impl StorageManager {
    pub fn new(backend: Box<dyn StoreBackend>, config: &TrackerConfig) -> Self {
        Self {
            backend,
            items_key: config.items_key.clone(),
            settings_key: config.settings_key.clone(),
            cache_key: config.cache_key.clone(),
        }
    }

    /// Open a directory-backed store (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_dir(
        dir: impl Into<std::path::PathBuf>,
        config: &TrackerConfig,
    ) -> Result<Self, CoreError> {
        let backend = super::backend::FileBackend::new(dir)?;
        Ok(Self::new(Box::new(backend), config))
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let text = match self.backend.read(key) {
            Ok(Some(text)) => text,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!("Failed to read store '{key}': {e}; using defaults");
                return T::default();
            }
        };
        match serde_json::from_str::<Option<T>>(&text) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!("Store '{key}' is malformed ({e}); using defaults");
                T::default()
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let text = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize '{key}': {e}")))?;
        self.backend.write(key, &text)
    }

    pub fn load_items(&self) -> Vec<PortfolioItem> {
        let mut items: Vec<PortfolioItem> = self.load_or_default(&self.items_key);
        assign_unique_ids(&mut items);
        items
    }

    pub fn save_items(&self, items: &[PortfolioItem]) -> Result<(), CoreError> {
        self.save(&self.items_key, items)
    }

    pub fn load_settings(&self) -> Settings {
        self.load_or_default(&self.settings_key)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), CoreError> {
        self.save(&self.settings_key, settings)
    }

    pub fn load_cache(&self) -> ProductCache {
        self.load_or_default(&self.cache_key)
    }

    pub fn save_cache(&self, cache: &ProductCache) -> Result<(), CoreError> {
        self.save(&self.cache_key, cache)
    }

    /// Load all three stores.
    pub fn load_portfolio(&self) -> Portfolio {
        Portfolio {
            items: self.load_items(),
            settings: self.load_settings(),
            cache: self.load_cache(),
        }
    }

    /// Save all three stores.
    pub fn save_portfolio(&self, portfolio: &Portfolio) -> Result<(), CoreError> {
        self.save_items(&portfolio.items)?;
        self.save_settings(&portfolio.settings)?;
        self.save_cache(&portfolio.cache)
    }
}
