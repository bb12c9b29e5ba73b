//! Tolerant field deserializers for backend-produced JSON.
//!
//! Backends frequently drift from the requested schema: numbers arrive as
//! strings, optional fields arrive as `null`, and one malformed array entry
//! should not discard an otherwise usable result. These helpers are wired
//! in through `#[serde(deserialize_with = ...)]` on the schema types.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Lowest and highest accepted quality score.
pub const SCORE_RANGE: (f64, f64) = (0.0, 10.0);

/// Deserialize a sequence, dropping elements that fail to deserialize.
///
/// A `null` or non-array value yields an empty sequence. Each skipped
/// element is logged with the reason.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(
                element = short_type_name::<T>(),
                found = json_kind(&other),
                "expected an array; treating as empty"
            );
            return Ok(Vec::new());
        }
    };

    let mut kept = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(parsed) => kept.push(parsed),
            Err(e) => tracing::warn!(
                element = short_type_name::<T>(),
                index,
                error = %e,
                "skipping malformed element"
            ),
        }
    }
    Ok(kept)
}

/// Deserialize a quality score, coercing numeric strings and clamping.
///
/// Anything that is not a finite number becomes `0`.
pub fn score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match &value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(clamp_score(raw))
}

/// Clamp a raw score into [`SCORE_RANGE`].
pub fn clamp_score(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(SCORE_RANGE.0, SCORE_RANGE.1)
}

/// Deserialize a required text field. Scalars are stringified; `null`,
/// arrays and objects are rejected.
pub fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value).ok_or_else(|| de::Error::custom("expected text"))
}

/// Deserialize an optional text field; `null` becomes an empty string.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(String::new());
    }
    scalar_to_string(value).ok_or_else(|| de::Error::custom("expected text"))
}

/// Deserialize an optional text field into `Option`; blank strings and
/// `null` become `None`.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value).filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional positive line number.
///
/// Accepts integers, integral floats and numeric strings. Zero, negative
/// and unparseable values become `None` rather than failing the element.
pub fn line_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(raw
        .filter(|n| n.is_finite() && n.fract() == 0.0 && *n >= 1.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
