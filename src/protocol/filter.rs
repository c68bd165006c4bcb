//! Encoded query-filter decoding.
//!
//! The host sends tab-query filters as base64-encoded JSON objects.
//! Values arrive as strings more often than not (they cross two
//! process boundaries on the way here), so a fixed coercion schema
//! rewrites them into what the vendor surface expects:
//!
//! - boolean keys: case-insensitive `"true"`/`"false"` strings become
//!   booleans; any other string passes through unchanged
//! - integer keys: numeric strings become numbers
//! - every other key passes through unchanged

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as Base64Standard;
use base64::Engine;
use rustc_hash::FxHashSet;
use serde_json::{Map, Number, Value};

use crate::capability::QueryFilter;
use crate::error::{Error, Result};

// ============================================================================
// Coercion Schema
// ============================================================================

/// Keys whose values must be booleans.
static BOOLEAN_KEYS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "active",
        "pinned",
        "audible",
        "muted",
        "highlighted",
        "discarded",
        "autoDiscardable",
        "currentWindow",
        "lastFocusedWindow",
    ]
    .into_iter()
    .collect()
});

/// Keys whose values must be integers.
static INTEGER_KEYS: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| ["windowId", "index"].into_iter().collect());

// ============================================================================
// Decoding
// ============================================================================

/// Decodes an encoded filter string into a vendor-ready filter.
///
/// # Errors
///
/// Returns [`Error::Decode`] for bad base64, non-object JSON, or a
/// value that cannot be coerced to its key's schema. Callers turn that
/// into an empty query result rather than propagating it.
pub fn decode_query(encoded: &str) -> Result<QueryFilter> {
    let bytes = Base64Standard
        .decode(encoded.trim())
        .map_err(|e| Error::decode(format!("bad filter encoding: {e}")))?;

    let raw: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| Error::decode(format!("filter is not a JSON object: {e}")))?;

    let mut coerced = Map::with_capacity(raw.len());
    for (key, value) in raw {
        let value = coerce(&key, value)?;
        coerced.insert(key, value);
    }
    Ok(QueryFilter::from_map(coerced))
}

/// Applies the coercion schema to one filter entry.
fn coerce(key: &str, value: Value) -> Result<Value> {
    if BOOLEAN_KEYS.contains(key) && !value.is_boolean() {
        let Some(text) = value.as_str() else {
            return Err(Error::decode(format!(
                "boolean filter key {key} holds neither bool nor string"
            )));
        };
        return Ok(match text.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text.to_string()),
        });
    }

    if INTEGER_KEYS.contains(key) && !value.is_number() {
        let parsed = value
            .as_str()
            .and_then(|text| text.trim().parse::<i64>().ok())
            .ok_or_else(|| Error::decode(format!("integer filter key {key} is not numeric")))?;
        return Ok(Value::Number(Number::from(parsed)));
    }

    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn encode(value: &Value) -> String {
        Base64Standard.encode(value.to_string())
    }

    #[test]
    fn test_decodes_and_coerces_mixed_strings() {
        let encoded = encode(&json!({"active": "TRUE", "windowId": "7"}));
        let filter = decode_query(&encoded).expect("decode");
        assert_eq!(
            filter.to_value(),
            json!({"active": true, "windowId": 7})
        );
    }

    #[test]
    fn test_native_types_pass_through() {
        let encoded = encode(&json!({"pinned": false, "index": 3}));
        let filter = decode_query(&encoded).expect("decode");
        assert_eq!(filter.to_value(), json!({"pinned": false, "index": 3}));
    }

    #[test]
    fn test_unschema_keys_pass_through() {
        let encoded = encode(&json!({"url": "*://example.com/*", "status": "complete"}));
        let filter = decode_query(&encoded).expect("decode");
        assert_eq!(
            filter.to_value(),
            json!({"url": "*://example.com/*", "status": "complete"})
        );
    }

    #[test]
    fn test_non_truthword_string_passes_through() {
        let encoded = encode(&json!({"active": "maybe"}));
        let filter = decode_query(&encoded).expect("decode");
        assert_eq!(filter.to_value(), json!({"active": "maybe"}));
    }

    #[test]
    fn test_case_insensitive_booleans() {
        let encoded = encode(&json!({"muted": "False", "highlighted": "tRuE"}));
        let filter = decode_query(&encoded).expect("decode");
        assert_eq!(
            filter.to_value(),
            json!({"muted": false, "highlighted": true})
        );
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(decode_query("%%%not-base64%%%").is_err());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let encoded = Base64Standard.encode("[1, 2, 3]");
        assert!(decode_query(&encoded).is_err());
    }

    #[test]
    fn test_rejects_unparseable_integer() {
        let encoded = encode(&json!({"windowId": "seven"}));
        assert!(decode_query(&encoded).is_err());
    }

    #[test]
    fn test_rejects_numeric_boolean() {
        let encoded = encode(&json!({"active": 1}));
        assert!(decode_query(&encoded).is_err());
    }
}
