use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::number_from_value;

/// A product record as returned by the external catalog. Its shape varies
/// between endpoints, so it is kept as untyped JSON.
pub type RawProduct = Value;

/// Canonical view of a catalog product, derived from a [`RawProduct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    pub id: Option<String>,
    pub name: String,
    pub series: String,
    pub image: Option<String>,
    pub cm_link: Option<String>,
}

/// Lowest Cardmarket listing prices for one product.
///
/// Read from `prices.cardmarket` of a raw record. Fields that are missing
/// or not numeric are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBlock {
    pub lowest: Option<f64>,
    #[serde(rename = "lowest_DE")]
    pub lowest_de: Option<f64>,
    #[serde(rename = "lowest_FR")]
    pub lowest_fr: Option<f64>,
    pub currency: Option<String>,
}

impl PriceBlock {
    /// Build a block from an untyped JSON object. Returns `None` for null
    /// and non-object values.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |key: &str| obj.get(key).and_then(number_from_value);
        Some(Self {
            lowest: field("lowest"),
            lowest_de: field("lowest_DE"),
            lowest_fr: field("lowest_FR"),
            currency: obj
                .get("currency")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }
}

/// A search hit prepared for an autocomplete list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub product: NormalizedProduct,
    /// Market price resolved for the requested language.
    pub price: Option<f64>,
    /// Currency of `price` as reported by the catalog (EUR when absent).
    pub currency: String,
}
