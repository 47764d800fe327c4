use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient::{
    de_amount, de_opt_string, de_opt_timestamp, de_quantity, de_string, sanitize_amount,
};

/// Provenance tag stored on items whose market data comes from the catalog proxy.
pub const CATALOG_SOURCE: &str = "rapidapi:pokemon-tcg";

fn default_quantity() -> u32 {
    1
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Blank or non-text ids get a fresh one.
fn de_item_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let id = de_string(deserializer)?;
    Ok(if id.trim().is_empty() { new_item_id() } else { id })
}

/// Give every item after the first sharing an id a fresh one.
pub fn assign_unique_ids(items: &mut [PortfolioItem]) {
    let mut seen = std::collections::HashSet::new();
    for item in items.iter_mut() {
        if !seen.insert(item.id.clone()) {
            item.id = new_item_id();
            seen.insert(item.id.clone());
        }
    }
}

/// One owned lot of a sealed product: a quantity bought at one unit price.
///
/// Serialized with camelCase keys so exported files stay readable by
/// older builds of the tracker. Deserialization is tolerant: bad monetary
/// values become 0 and a missing quantity defaults to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    /// Stable unique identifier. Never changes after creation.
    #[serde(default = "new_item_id", deserialize_with = "de_item_id")]
    pub id: String,

    #[serde(default, deserialize_with = "de_string")]
    pub name: String,

    /// Free-form product language, e.g. "English", "German (sealed)".
    #[serde(default, deserialize_with = "de_string")]
    pub language: String,

    /// ISO date (`YYYY-MM-DD`) or empty.
    #[serde(default, deserialize_with = "de_string")]
    pub purchase_date: String,

    #[serde(default = "default_quantity", deserialize_with = "de_quantity")]
    pub quantity: u32,

    /// Unit price paid.
    #[serde(default, deserialize_with = "de_amount")]
    pub price_paid: f64,

    /// Unit market price. May be stale; see `market_updated_at`.
    #[serde(default, deserialize_with = "de_amount")]
    pub market_price: f64,

    /// Milliseconds since the Unix epoch of the last market data change.
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub market_updated_at: Option<i64>,

    #[serde(default, deserialize_with = "de_opt_string")]
    pub image_url: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string")]
    pub cardmarket_url: Option<String>,

    /// External catalog identifier.
    #[serde(default, deserialize_with = "de_opt_string")]
    pub api_id: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string")]
    pub api_source: Option<String>,

    #[serde(default, deserialize_with = "de_string")]
    pub notes: String,
}

impl PortfolioItem {
    /// Create a new lot with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        quantity: u32,
        price_paid: f64,
    ) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            language: language.into(),
            purchase_date: String::new(),
            quantity,
            price_paid: sanitize_amount(price_paid),
            market_price: 0.0,
            market_updated_at: None,
            image_url: None,
            cardmarket_url: None,
            api_id: None,
            api_source: None,
            notes: String::new(),
        }
    }

    pub fn with_purchase_date(mut self, date: impl Into<String>) -> Self {
        self.purchase_date = date.into();
        self
    }

    pub fn with_market_price(mut self, price: f64) -> Self {
        self.market_price = sanitize_amount(price);
        self
    }

    pub fn with_api_id(mut self, api_id: impl Into<String>) -> Self {
        let api_id = api_id.into();
        self.api_id = (!api_id.is_empty()).then_some(api_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// The catalog id, if set and non-blank.
    pub fn catalog_id(&self) -> Option<&str> {
        self.api_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn unit_paid(&self) -> f64 {
        sanitize_amount(self.price_paid)
    }

    pub fn unit_market(&self) -> f64 {
        sanitize_amount(self.market_price)
    }

    /// quantity × price paid
    pub fn invested(&self) -> f64 {
        f64::from(self.quantity) * self.unit_paid()
    }

    /// quantity × market price
    pub fn market_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_market()
    }

    /// quantity × (market price − price paid)
    pub fn profit_loss(&self) -> f64 {
        f64::from(self.quantity) * (self.unit_market() - self.unit_paid())
    }

    pub fn has_market_price(&self) -> bool {
        self.unit_market() > 0.0
    }

    /// Case-insensitive substring match across name, language and notes.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.language.to_lowercase().contains(needle)
            || self.notes.to_lowercase().contains(needle)
    }
}
