// ═══════════════════════════════════════════════════════════════════
// Storage Tests: backends, StorageManager, export / import
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use serde_json::json;

use sealed_portfolio_core::config::TrackerConfig;
use sealed_portfolio_core::errors::CoreError;
use sealed_portfolio_core::models::cache::ProductCache;
use sealed_portfolio_core::models::item::PortfolioItem;
use sealed_portfolio_core::models::portfolio::Portfolio;
use sealed_portfolio_core::models::settings::{Currency, Settings, SortKey, Theme};
use sealed_portfolio_core::storage::backend::{
    store_file_stem, FileBackend, MemoryBackend, StoreBackend,
};
use sealed_portfolio_core::storage::manager::StorageManager;
use sealed_portfolio_core::storage::transfer::{
    export_file_name, export_json, parse_import, ImportedData, INVALID_FORMAT,
};

fn sample_items() -> Vec<PortfolioItem> {
    vec![
        PortfolioItem::new("Evolving Skies Booster Box", "English", 2, 150.0)
            .with_purchase_date("2024-01-10")
            .with_market_price(210.0)
            .with_api_id("es-bb"),
        PortfolioItem::new("Crown Zenith ETB", "German", 1, 55.0),
    ]
}

fn manager_with(backend: MemoryBackend) -> StorageManager {
    StorageManager::new(Box::new(backend), &TrackerConfig::default())
}

// ═══════════════════════════════════════════════════════════════════
// Backends
// ═══════════════════════════════════════════════════════════════════

mod backends {
    use super::*;

    #[test]
    fn memory_read_write_remove() {
        let b = MemoryBackend::new();
        assert_eq!(b.read("k").unwrap(), None);
        b.write("k", "v1").unwrap();
        b.write("k", "v2").unwrap();
        assert_eq!(b.read("k").unwrap().as_deref(), Some("v2"));
        b.remove("k").unwrap();
        assert_eq!(b.read("k").unwrap(), None);
    }

    #[test]
    fn file_backend_sanitizes_key() {
        let dir = tempfile::tempdir().unwrap();
        let b = FileBackend::new(dir.path()).unwrap();
        let path = b.path_for("sealedPokemonPortfolio:apiCache:v1");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "sealedPokemonPortfolio_apiCache_v1.json"
        );
        assert_eq!(store_file_stem("a:b"), store_file_stem("a_b"));
    }

    #[test]
    fn file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let b = FileBackend::new(dir.path().join("nested")).unwrap();
        assert_eq!(b.read("items").unwrap(), None);
        b.write("items", "[1,2]").unwrap();
        assert_eq!(b.read("items").unwrap().as_deref(), Some("[1,2]"));
        assert!(b.path_for("items").exists());
        b.remove("items").unwrap();
        b.remove("items").unwrap();
        assert_eq!(b.read("items").unwrap(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[test]
    fn empty_store_loads_defaults() {
        let m = manager_with(MemoryBackend::new());
        assert_eq!(m.load_portfolio(), Portfolio::default());
    }

    #[test]
    fn items_round_trip() {
        let m = manager_with(MemoryBackend::new());
        let items = sample_items();
        m.save_items(&items).unwrap();
        assert_eq!(m.load_items(), items);
    }

    #[test]
    fn settings_round_trip() {
        let m = manager_with(MemoryBackend::new());
        let settings = Settings {
            currency: Currency::Chf,
            theme: Theme::Light,
            sort_by: SortKey::Invested,
            last_refresh_at: Some(1_700_000_000_000),
            ..Settings::default()
        };
        m.save_settings(&settings).unwrap();
        assert_eq!(m.load_settings(), settings);
    }

    #[test]
    fn cache_round_trip() {
        let m = manager_with(MemoryBackend::new());
        let mut cache = ProductCache::new();
        cache.put("p1", json!({ "id": "p1" }), 7);
        m.save_cache(&cache).unwrap();
        assert_eq!(m.load_cache(), cache);
    }

    #[test]
    fn malformed_stores_fall_back_independently() {
        let config = TrackerConfig::default();
        let backend = MemoryBackend::new();
        backend.write(&config.items_key, "{not json").unwrap();
        backend.write(&config.settings_key, "null").unwrap();
        backend
            .write(&config.cache_key, r#"{"p1":{"data":{"id":"p1"},"fetchedAt":5}}"#)
            .unwrap();

        let m = manager_with(backend);
        assert!(m.load_items().is_empty());
        assert_eq!(m.load_settings(), Settings::default());
        assert_eq!(m.load_cache().len(), 1);
    }

    #[test]
    fn stored_blank_ids_are_regenerated() {
        let config = TrackerConfig::default();
        let backend = MemoryBackend::new();
        backend
            .write(&config.items_key, r#"[{"id":"","name":"A"},{"name":"B"}]"#)
            .unwrap();
        let items = manager_with(backend).load_items();
        assert_eq!(items.len(), 2);
        assert!(!items[0].id.is_empty());
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn wrong_shape_falls_back() {
        let config = TrackerConfig::default();
        let backend = MemoryBackend::new();
        backend.write(&config.items_key, r#"{"items":[]}"#).unwrap();
        let m = manager_with(backend);
        assert!(m.load_items().is_empty());
    }

    #[test]
    fn directory_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::default();
        let portfolio = Portfolio {
            items: sample_items(),
            settings: Settings {
                currency: Currency::Usd,
                ..Settings::default()
            },
            cache: ProductCache::new(),
        };

        StorageManager::open_dir(dir.path(), &config)
            .unwrap()
            .save_portfolio(&portfolio)
            .unwrap();

        let reopened = StorageManager::open_dir(dir.path(), &config).unwrap();
        assert_eq!(reopened.load_portfolio(), portfolio);
    }

    #[test]
    fn custom_keys_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig {
            items_key: "items".into(),
            ..TrackerConfig::default()
        };
        let m = StorageManager::open_dir(dir.path(), &config).unwrap();
        m.save_items(&sample_items()).unwrap();
        assert!(dir.path().join("items.json").exists());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Export / Import
// ═══════════════════════════════════════════════════════════════════

mod transfer {
    use super::*;

    fn assert_invalid(result: Result<ImportedData, CoreError>) {
        match result {
            Err(CoreError::InvalidFileFormat(msg)) => assert_eq!(msg, INVALID_FORMAT),
            other => panic!("expected InvalidFileFormat, got {other:?}"),
        }
    }

    #[test]
    fn export_shape() {
        let settings = Settings {
            currency: Currency::Gbp,
            ..Settings::default()
        };
        let text = export_json(&settings, &sample_items()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["settings"]["currency"], "GBP");
        assert_eq!(v["items"].as_array().unwrap().len(), 2);
        assert_eq!(v["items"][0]["apiId"], "es-bb");
        assert!(text.contains('\n'));
    }

    #[test]
    fn export_then_import() {
        let items = sample_items();
        let settings = Settings {
            currency: Currency::Usd,
            theme: Theme::Light,
            ..Settings::default()
        };
        let imported = parse_import(&export_json(&settings, &items).unwrap()).unwrap();
        assert_eq!(imported.items.as_deref(), Some(items.as_slice()));
        assert_eq!(imported.currency, Some(Currency::Usd));
        assert_eq!(imported.theme, Some(Theme::Light));
    }

    #[test]
    fn legacy_array() {
        let imported = parse_import(r#"[{"id":"a","name":"Box","quantity":2}]"#).unwrap();
        let items = imported.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(imported.currency, None);
        assert_eq!(imported.theme, None);
    }

    #[test]
    fn blank_ids_are_regenerated() {
        let imported = parse_import(r#"[{"id": null, "name": "A"}, {"id": "", "name": "B"}]"#)
            .unwrap();
        let items = imported.items.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|it| !it.id.trim().is_empty()));
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn duplicate_ids_are_made_unique() {
        let imported =
            parse_import(r#"[{"id": "x", "name": "A"}, {"id": "x", "name": "B"}, {"id": 7}]"#)
                .unwrap();
        let items = imported.items.unwrap();
        assert_eq!(items[0].id, "x");
        assert_ne!(items[1].id, "x");
        assert_eq!(items[2].id, "7");
    }

    #[test]
    fn settings_only_document() {
        let imported =
            parse_import(r#"{"settings":{"currency":"XYZ","theme":"light","sortBy":"pl"}}"#)
                .unwrap();
        assert_eq!(imported.items, None);
        assert_eq!(imported.currency, None);
        assert_eq!(imported.theme, Some(Theme::Light));
    }

    #[test]
    fn invalid_inputs() {
        assert_invalid(parse_import("not json"));
        assert_invalid(parse_import("42"));
        assert_invalid(parse_import("\"text\""));
        assert_invalid(parse_import(r#"{"items":[1,2]}"#));
        assert_invalid(parse_import("[true]"));
    }

    #[test]
    fn apply_replaces_items_and_keeps_other_settings() {
        let mut items = sample_items();
        let mut settings = Settings {
            sort_by: SortKey::ProfitLoss,
            last_refresh_at: Some(99),
            ..Settings::default()
        };
        let imported = parse_import(r#"{"items":[],"settings":{"currency":"CHF"}}"#).unwrap();
        imported.apply(&mut items, &mut settings);
        assert!(items.is_empty());
        assert_eq!(settings.currency, Currency::Chf);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.sort_by, SortKey::ProfitLoss);
        assert_eq!(settings.last_refresh_at, Some(99));
    }

    #[test]
    fn apply_without_items_keeps_them() {
        let mut items = sample_items();
        let mut settings = Settings::default();
        ImportedData::default().apply(&mut items, &mut settings);
        assert_eq!(items.len(), 2);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(export_file_name(date), "sealed-pokemon-portfolio-2025-01-31.json");
    }
}
