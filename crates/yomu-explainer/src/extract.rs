use serde_json::{Map, Value};

/// Best-effort parse of a possibly incomplete JSON object.
///
/// Text that does not start with `{` and end with `}` after trimming is
/// rejected without parsing. Returns `None` on any parse failure.
pub fn try_parse(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') || !trimmed.ends_with('}') {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
