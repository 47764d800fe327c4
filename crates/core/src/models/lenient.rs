//! Tolerant deserializers for persisted and imported JSON.
//!
//! Stores written by older versions (or edited by hand) carry numbers as
//! strings, nulls where strings are expected, and so on. These helpers
//! degrade such values to defaults instead of rejecting the whole blob.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a number from a JSON number or a numeric string.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Clamp to a finite, non-negative amount. Anything else counts as 0.
pub(crate) fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

pub(crate) fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).map(sanitize_amount).unwrap_or(0.0))
}

pub(crate) fn de_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let qty = number_from_value(&value).map(sanitize_amount).unwrap_or(0.0);
    Ok(qty.min(u32::MAX as f64).trunc() as u32)
}

pub(crate) fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|n| n.is_finite())
        .map(|n| n as i64))
}

pub(crate) fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_from_value(&value).unwrap_or_default())
}

/// Optional text field. Empty strings collapse to `None`.
pub(crate) fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_from_value(&value).filter(|s| !s.is_empty()))
}

/// Render strings as-is and numbers in their JSON form; everything else is absent.
pub(crate) fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
