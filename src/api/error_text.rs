use serde_json::Value;

const MAX_RAW_LEN: usize = 300;

/// Collapse an API error body into one human-readable line.
///
/// Handles the shapes a DRF-style backend produces: `{"detail": ..}`,
/// `{"message": ..}`, `{"error": ..}`, nested `{"errors": {..}}`,
/// `non_field_errors` and per-field lists such as `{"email": ["taken"]}`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    match body {
        Value::Null => None,
        Value::String(s) => non_empty(s.trim()),
        Value::Bool(_) | Value::Number(_) => Some(body.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(extract_error_message).collect();
            non_empty(&parts.join(", "))
        }
        Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(msg) = map.get(key).and_then(extract_error_message) {
                    return Some(msg);
                }
            }
            if let Some(msg) = map.get("errors").and_then(extract_error_message) {
                return Some(msg);
            }
            if let Some(msg) = map.get("non_field_errors").and_then(extract_error_message) {
                return Some(msg);
            }

            let parts: Vec<String> = map
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "status" | "code" | "success"))
                .filter_map(|(key, value)| {
                    extract_error_message(value).map(|msg| format!("{key}: {msg}"))
                })
                .collect();
            non_empty(&parts.join("; "))
        }
    }
}

/// Same as [`extract_error_message`] but for a raw response body that may not be JSON.
pub fn extract_from_text(body: &str) -> Option<String> {
    let trimmed = body.trim();
    // HTML error pages carry nothing worth showing
    if trimmed.is_empty() || trimmed.starts_with('<') {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => extract_error_message(&value),
        Err(_) => Some(trimmed.chars().take(MAX_RAW_LEN).collect()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
