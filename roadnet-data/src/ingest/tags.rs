//! Tag mapping for raw OSM records.
//!
//! Converts the optional `tags` object of a record into a concrete
//! [`Tags`] map so ingestion never has to branch on an absent bag.
use roadnet_core::Tags;
use serde_json::{Map, Value};

/// Normalise an optional raw tag bag into [`Tags`].
///
/// An absent bag yields an empty map. Keys and string values are copied
/// verbatim. Other scalars keep their JSON text and `null` becomes an empty
/// string, so the result is always string-to-string.
///
/// # Examples
/// ```
/// use roadnet_data::map_tags;
/// use serde_json::json;
///
/// let raw = json!({"highway": "primary", "lanes": 2});
/// let tags = map_tags(raw.as_object());
/// assert_eq!(tags.get("highway").map(String::as_str), Some("primary"));
/// assert_eq!(tags.get("lanes").map(String::as_str), Some("2"));
///
/// assert!(map_tags(None).is_empty());
/// ```
#[must_use]
pub fn map_tags(raw: Option<&Map<String, Value>>) -> Tags {
    let Some(raw) = raw else {
        return Tags::new();
    };
    raw.iter()
        .map(|(key, value)| (key.clone(), tag_value(value)))
        .collect()
}

fn tag_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
