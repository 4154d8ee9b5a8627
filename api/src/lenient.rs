//! Tolerant field decoders for upstream payloads.
//!
//! The feeds disagree on whether numbers arrive as integers, floats or strings,
//! and occasionally send the wrong shape altogether. These helpers turn anything
//! unexpected into `None` (or an empty list) instead of failing the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer view of a JSON value: `41`, `41.0`, `"41"` and `" 41.9 "` all give 41.
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

/// String view of a JSON value. Numbers are rendered, everything else is `None`.
pub fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `deserialize_with` adapter for integer fields.
pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(int_from_value))
}

/// `deserialize_with` adapter for string fields that are sometimes numeric.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(string_from_value))
}

/// `deserialize_with` adapter for nested objects: a mismatched shape becomes `None`.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// `deserialize_with` adapter for lists: elements that fail to decode are dropped
/// individually, and a non-array becomes an empty list.
pub fn each<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Seconds of recorded playing time, from `"12:00"`, `"25.000000:30"`,
/// `"PT25M01.00S"` or a bare minute count. `None` when the text is unreadable.
pub fn playing_seconds(minutes: &str) -> Option<f64> {
    let text = minutes.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    if let Some(iso) = text.strip_prefix("PT") {
        let (mins, rest) = iso.split_once('M').unwrap_or(("0", iso));
        let secs = rest.trim_end_matches('S');
        let mins = if mins.is_empty() { 0.0 } else { mins.parse::<f64>().ok()? };
        let secs = if secs.is_empty() { 0.0 } else { secs.parse::<f64>().ok()? };
        return Some(mins * 60.0 + secs);
    }

    match text.split_once(':') {
        Some((mins, secs)) => {
            let mins = mins.trim().parse::<f64>().ok()?;
            let secs = secs.trim().parse::<f64>().ok()?;
            Some(mins * 60.0 + secs)
        }
        None => text.parse::<f64>().ok().map(|m| m * 60.0),
    }
}
