//! Maps catalog records of unknown shape onto [`NormalizedProduct`].
//!
//! Each output field is resolved by walking an ordered table of JSON paths
//! and taking the first value that is present. The tables are plain data
//! so they can be inspected and tested on their own.

use serde_json::Value;

use crate::models::lenient::string_from_value;
use crate::models::product::{NormalizedProduct, PriceBlock, RawProduct};

/// Name used when a record carries none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// One step of a path into a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Key(&'static str),
    Index(usize),
}

/// A path from the record root to a field.
pub type FieldPath = &'static [Segment];

use Segment::{Index, Key};

pub const ID_RULES: &[FieldPath] = &[
    &[Key("id")],
    &[Key("productId")],
    &[Key("_id")],
    &[Key("uuid")],
    &[Key("code")],
];

pub const NAME_RULES: &[FieldPath] = &[&[Key("name")], &[Key("title")], &[Key("productName")]];

pub const SERIES_RULES: &[FieldPath] = &[
    &[Key("series")],
    &[Key("set")],
    &[Key("collection")],
    &[Key("expansion")],
    &[Key("episode"), Key("name")],
    &[Key("episode"), Key("slug")],
];

pub const IMAGE_RULES: &[FieldPath] = &[
    &[Key("image")],
    &[Key("imageUrl")],
    &[Key("thumbnail")],
    &[Key("images"), Key("small")],
    &[Key("images"), Key("thumb")],
    &[Key("images"), Index(0)],
];

pub const CARDMARKET_LINK_RULES: &[FieldPath] = &[&[Key("links"), Key("cardmarket")]];

pub const PRICE_BLOCK_PATH: FieldPath = &[Key("prices"), Key("cardmarket")];

/// Follow `path` from `record`. Missing keys, wrong types and out-of-range
/// indices all yield `None`.
pub fn lookup<'a>(record: &'a Value, path: FieldPath) -> Option<&'a Value> {
    path.iter().try_fold(record, |current, segment| match segment {
        Key(key) => current.get(*key),
        Index(idx) => current.get(*idx),
    })
}

/// Null, `false`, `0` and `""` do not count as present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The first present value among `rules`, in table order.
pub fn first_present<'a>(record: &'a Value, rules: &[FieldPath]) -> Option<&'a Value> {
    rules
        .iter()
        .filter_map(|path| lookup(record, path))
        .find(|value| is_present(value))
}

fn first_text(record: &Value, rules: &[FieldPath]) -> Option<String> {
    first_present(record, rules).and_then(string_from_value)
}

/// Normalize a raw catalog record. Never fails; absent fields take defaults.
pub fn normalize_product(record: &Value) -> NormalizedProduct {
    NormalizedProduct {
        id: first_text(record, ID_RULES),
        name: first_text(record, NAME_RULES).unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        series: first_text(record, SERIES_RULES).unwrap_or_default(),
        image: first_text(record, IMAGE_RULES),
        cm_link: first_text(record, CARDMARKET_LINK_RULES),
    }
}

/// The Cardmarket price block (`prices.cardmarket`) of a record, if any.
pub fn price_block(record: &Value) -> Option<PriceBlock> {
    lookup(record, PRICE_BLOCK_PATH)
        .filter(|v| is_present(v))
        .and_then(PriceBlock::from_value)
}

/// Extract the product record from a detail response.
///
/// The proxy answers with either the record itself, a one-element list,
/// or a wrapper object holding it under `data` or `product`.
pub fn unwrap_detail(detail: RawProduct) -> Option<RawProduct> {
    let record = match detail {
        Value::Array(items) => items.into_iter().next()?,
        Value::Object(mut obj) => {
            let wrapped = ["data", "product"]
                .into_iter()
                .find(|key| obj.get(*key).is_some_and(is_present));
            match wrapped {
                Some(key) => obj.remove(key)?,
                None => Value::Object(obj),
            }
        }
        other => other,
    };
    is_present(&record).then_some(record)
}
