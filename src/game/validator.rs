//! Boundary between model output and game state.
//!
//! Whatever a provider returns is untrusted until it gets through [`parse`].
//! Text and already-decoded objects go through the same field checks, and any
//! failure comes back as `MalformedResponse` carrying the original payload.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::game::models::GenerationResult;
use crate::llm::models::RawOutput;

const STRING_FIELDS: [&str; 5] = ["story", "firstoption", "secondoption", "name", "location"];

pub fn parse(raw: RawOutput) -> Result<GenerationResult, CoreError> {
    let payload = raw.to_text();

    // A JSON string delivered as a value is still serialized text.
    let value = match raw {
        RawOutput::Structured(Value::String(text)) | RawOutput::Text(text) => {
            serde_json::from_str::<Value>(strip_code_fence(&text)).map_err(|e| {
                CoreError::malformed(format!("invalid JSON: {}", e), payload.as_str())
            })?
        }
        RawOutput::Structured(value) => value,
    };

    let Value::Object(fields) = &value else {
        return Err(CoreError::malformed("expected a JSON object", payload));
    };

    if let Err(reason) = check_fields(fields) {
        return Err(CoreError::malformed(reason, payload));
    }

    serde_json::from_value(value).map_err(|e| CoreError::malformed(e.to_string(), payload))
}

/// Serialized form of a validated turn, as stored in session history.
pub fn to_raw(result: &GenerationResult) -> Result<String, CoreError> {
    serde_json::to_string(result)
        .map_err(|e| CoreError::malformed(e.to_string(), format!("{:?}", result)))
}

fn check_fields(fields: &Map<String, Value>) -> Result<(), String> {
    for key in STRING_FIELDS {
        match fields.get(key) {
            Some(Value::String(_)) => {}
            Some(_) => return Err(format!("field '{}' must be a string", key)),
            None => return Err(format!("missing field '{}'", key)),
        }
    }

    match fields.get("hp") {
        Some(hp) if is_integer(hp) => {}
        Some(_) => return Err("field 'hp' must be an integer".to_string()),
        None => return Err("missing field 'hp'".to_string()),
    }

    let items = match fields.get("inventory") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err("field 'inventory' must be an array".to_string()),
        None => return Err("missing field 'inventory'".to_string()),
    };

    for (index, item) in items.iter().enumerate() {
        let Value::Object(item) = item else {
            return Err(format!("inventory[{}] must be an object", index));
        };
        if !matches!(item.get("name"), Some(Value::String(_))) {
            return Err(format!("inventory[{}].name must be a string", index));
        }
        if !item.get("quantity").is_some_and(is_integer) {
            return Err(format!("inventory[{}].quantity must be an integer", index));
        }
    }

    Ok(())
}

fn is_integer(value: &Value) -> bool {
    value.is_i64()
}

/// Models like to wrap JSON in a ```json fence even when told not to. The
/// language tag, whatever its case, runs to the end of the opening line.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.find(['\n', '{', '[']) {
        Some(start) => &rest[start..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
