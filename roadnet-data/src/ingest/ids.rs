use serde_json::Value;

/// Coerce a raw JSON identifier into `u64`.
///
/// Accepts non-negative integral numbers and decimal strings; anything else
/// is reported with a short reason. Identifiers are never narrowed.
pub(super) fn coerce_raw_id(value: &Value) -> Result<u64, &'static str> {
    match value {
        Value::Number(number) => {
            if let Some(raw) = number.as_u64() {
                Ok(raw)
            } else if number.as_i64().is_some() {
                Err("must not be negative")
            } else {
                Err("must be an integer")
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| "must be a non-negative integer"),
        _ => Err("must be an integer"),
    }
}
