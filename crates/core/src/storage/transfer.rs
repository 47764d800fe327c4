//! Export and import of the portfolio as a JSON document.
//!
//! Document shape: `{ "settings": {...}, "items": [...] }`. A bare array of
//! items (the legacy format) is accepted on import as well.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::item::{assign_unique_ids, PortfolioItem};
use crate::models::settings::{Currency, Settings, Theme};

/// Message shown for any unreadable import.
pub const INVALID_FORMAT: &str = "Invalid file format";

#[derive(Serialize)]
struct ExportDocument<'a> {
    settings: &'a Settings,
    items: &'a [PortfolioItem],
}

/// Pretty-printed export document.
pub fn export_json(settings: &Settings, items: &[PortfolioItem]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(&ExportDocument { settings, items })
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize export: {e}")))
}

/// Suggested download name, e.g. `sealed-pokemon-portfolio-2025-01-31.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("sealed-pokemon-portfolio-{}.json", date.format("%Y-%m-%d"))
}

/// Parsed import, not yet applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedData {
    /// Replacement item list; `None` leaves the items untouched.
    pub items: Option<Vec<PortfolioItem>>,
    pub currency: Option<Currency>,
    pub theme: Option<Theme>,
}

impl ImportedData {
    /// Overwrite the items (if present) and pull currency and theme.
    /// Nothing else in `settings` is touched.
    pub fn apply(self, items: &mut Vec<PortfolioItem>, settings: &mut Settings) {
        if let Some(imported) = self.items {
            *items = imported;
        }
        if let Some(currency) = self.currency {
            settings.currency = currency;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
    }
}

fn invalid() -> CoreError {
    CoreError::InvalidFileFormat(INVALID_FORMAT.into())
}

fn parse_items(value: Value) -> Result<Vec<PortfolioItem>, CoreError> {
    let mut items: Vec<PortfolioItem> = serde_json::from_value(value).map_err(|_| invalid())?;
    assign_unique_ids(&mut items);
    Ok(items)
}

/// Parse an import document. All-or-nothing: any problem yields
/// [`CoreError::InvalidFileFormat`] and nothing should be applied.
pub fn parse_import(json: &str) -> Result<ImportedData, CoreError> {
    let data: Value = serde_json::from_str(json).map_err(|_| invalid())?;

    if data.is_array() {
        return Ok(ImportedData {
            items: Some(parse_items(data)?),
            ..ImportedData::default()
        });
    }
    let Value::Object(mut obj) = data else {
        return Err(invalid());
    };

    let items = match obj.remove("items") {
        Some(list @ Value::Array(_)) => Some(parse_items(list)?),
        _ => None,
    };

    let settings = obj.get("settings");
    let text = |key: &str| {
        settings
            .and_then(|s| s.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    Ok(ImportedData {
        items,
        currency: text("currency").and_then(Currency::parse),
        theme: text("theme").map(|t| Theme::from(t.to_string())),
    })
}
