use serde_json::Value;

/// Returned when nothing readable can be pulled out of an error payload
pub const UNKNOWN_ERROR: &str = "Une erreur inconnue est survenue";

/// Keys checked, in order, for a single human readable message
const MESSAGE_KEYS: [&str; 4] = ["detail", "message", "error", "msg"];

/// Turn any backend error payload into a single display string
///
/// Handles the shapes the API answers with:
/// `{"detail": "..."}`, `{"email": ["required"]}`, `["a", "b"]`, plain strings.
///
/// Never returns an empty string.
pub fn extract_error_message(value: &Value) -> String {
    let message = extract(value);
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Same as [`extract_error_message`] but starting from a raw response body
pub fn extract_error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => extract_error_message(&value),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => UNKNOWN_ERROR.to_string(),
    }
}

fn extract(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(extract)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(map) => {
            for key in MESSAGE_KEYS {
                if let Some(inner) = map.get(key) {
                    if !inner.is_null() {
                        let message = extract(inner);
                        if !message.is_empty() {
                            return message;
                        }
                    }
                }
            }

            // Field validation maps: {"amount": ["too small"], "phone": ["required"]}
            let field_errors: Vec<String> = map
                .iter()
                .filter_map(|(field, inner)| match inner {
                    Value::Array(items) => Some(format!(
                        "{}: {}",
                        field,
                        items.iter().map(extract).collect::<Vec<_>>().join(" ")
                    )),
                    _ => None,
                })
                .collect();
            if !field_errors.is_empty() {
                return field_errors.join("; ");
            }

            map.values()
                .map(extract)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        }
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
