use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Custom deserializer for untrusted optional fields
///
/// A field holding the wrong JSON type reads as `None` instead of failing the whole
/// message, so one odd field never costs us the rest of the line.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Custom deserializer for message content that is either a bare string or an array of
/// typed segments
///
/// A string becomes a single segment via `From<String>`. Array elements that don't
/// decode as a segment are dropped; any other JSON type yields no segments.
pub fn deserialize_segments<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + From<String>,
{
    let value = Value::deserialize(deserializer)?;
    let segments = match value {
        Value::String(s) => vec![T::from(s)],
        Value::Array(items) => {
            items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect()
        }
        _ => Vec::new(),
    };
    Ok(segments)
}
