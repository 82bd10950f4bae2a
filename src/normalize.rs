//! Value normalization
//!
//! Raw values decoded from JSON bridges arrive with whatever widths and
//! encodings the source platform happened to use: 64-bit integers for
//! everything, double-precision floats, binary blobs smuggled through
//! strings as base64. This module collapses them into the canonical
//! [`PrefValue`] widths.
//!
//! Normalization is pure and infallible: every failure path degrades to
//! "return the input unchanged".

use crate::value::{PrefValue, PrefsMap};
use base64::prelude::{Engine, BASE64_STANDARD};

/// Marker Unity's JSON bridges prepend to base64-encoded binary payloads.
const BASE64_MARKER: &str = "$base64Binary;";

/// Normalize a full decoded JSON document into a preference map.
///
/// Non-object roots yield an empty map; a preference store is always a
/// dictionary at the top level.
pub fn normalize_json_map(root: serde_json::Value) -> PrefsMap {
    match root {
        serde_json::Value::Object(fields) => fields
            .into_iter()
            .map(|(key, value)| (key, normalize_json(value)))
            .collect(),
        _ => PrefsMap::new(),
    }
}

/// Normalize a single decoded JSON value.
pub fn normalize_json(raw: serde_json::Value) -> PrefValue {
    match raw {
        serde_json::Value::Null => PrefValue::Null,
        serde_json::Value::Bool(b) => PrefValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                PrefValue::from_i64(i)
            } else if n.is_u64() {
                // Beyond i64 range; keep the textual form
                PrefValue::Str(n.to_string())
            } else if let Some(f) = n.as_f64() {
                PrefValue::from_f64(f)
            } else {
                PrefValue::Str(n.to_string())
            }
        }
        serde_json::Value::String(s) => normalize_string(s),
        serde_json::Value::Array(items) => {
            PrefValue::List(items.into_iter().map(normalize_json).collect())
        }
        serde_json::Value::Object(fields) => PrefValue::Dict(
            fields
                .into_iter()
                .map(|(key, value)| (key, normalize_json(value)))
                .collect(),
        ),
    }
}

/// Apply the string heuristics: explicit base64 marker first, then the
/// speculative length-multiple-of-4 sniff.
///
/// The sniff can misfire on legitimate strings that happen to be valid
/// base64 decoding to clean UTF-8 (e.g. `"dGVzdA=="` stored literally).
/// This mirrors the engine-side behavior and is a known false-positive
/// source; callers get no signal when it triggers.
pub fn normalize_string(raw: String) -> PrefValue {
    if let Some(payload) = raw.strip_prefix(BASE64_MARKER) {
        return match decode_base64_utf8(payload) {
            Some(text) => PrefValue::Str(text),
            None => PrefValue::Str(raw),
        };
    }

    if !raw.is_empty() && raw.len() % 4 == 0 {
        if let Some(text) = decode_base64_utf8(&raw) {
            return PrefValue::Str(text);
        }
    }

    PrefValue::Str(raw)
}

/// Decode base64 then UTF-8, rejecting output that needed replacement
/// characters. `None` means "leave the original alone".
fn decode_base64_utf8(payload: &str) -> Option<String> {
    let bytes = BASE64_STANDARD.decode(payload).ok()?;
    let text = String::from_utf8_lossy(&bytes);
    if text.contains('\u{FFFD}') {
        return None;
    }
    Some(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(normalize_json(json!(42)), PrefValue::I32(42));
        assert_eq!(normalize_json(json!(-42)), PrefValue::I32(-42));
        assert_eq!(
            normalize_json(json!(5_000_000_000_i64)),
            PrefValue::I64(5_000_000_000)
        );
        assert_eq!(
            normalize_json(json!(i32::MAX as i64)),
            PrefValue::I32(i32::MAX)
        );
        assert_eq!(
            normalize_json(json!(i32::MIN as i64)),
            PrefValue::I32(i32::MIN)
        );
    }

    #[test]
    fn test_double_narrowed_to_single() {
        let d = 3.14159265358979_f64;
        assert_eq!(normalize_json(json!(d)), PrefValue::F32(d as f32));
    }

    #[test]
    fn test_base64_marker() {
        let value = normalize_string("$base64Binary;SGVsbG8=".to_string());
        assert_eq!(value, PrefValue::Str("Hello".to_string()));
    }

    #[test]
    fn test_base64_marker_invalid_payload_kept() {
        // Not valid base64 after the marker; the whole string survives.
        let original = "$base64Binary;***".to_string();
        assert_eq!(
            normalize_string(original.clone()),
            PrefValue::Str(original)
        );
    }

    #[test]
    fn test_speculative_sniff_accepts_clean_utf8() {
        // 8 chars, valid base64, decodes to "Hello"
        assert_eq!(
            normalize_string("SGVsbG8=".to_string()),
            PrefValue::Str("Hello".to_string())
        );
    }

    #[test]
    fn test_speculative_sniff_rejects_non_base64() {
        // 12 chars but contains characters outside the base64 alphabet
        let original = "Hello, World".to_string();
        assert_eq!(
            normalize_string(original.clone()),
            PrefValue::Str(original)
        );
    }

    #[test]
    fn test_speculative_sniff_rejects_binary_output() {
        // "///9" decodes to 0xFF 0xFF 0xFD, which is not UTF-8
        let original = "///9".to_string();
        assert_eq!(
            normalize_string(original.clone()),
            PrefValue::Str(original)
        );
    }

    #[test]
    fn test_unaligned_length_untouched() {
        let original = "SGVsbG8".to_string(); // 7 chars
        assert_eq!(
            normalize_string(original.clone()),
            PrefValue::Str(original)
        );
    }

    #[test]
    fn test_map_normalization() {
        let root = json!({
            "count": 7,
            "wide": 9_000_000_000_i64,
            "ratio": 0.5,
            "blob": "$base64Binary;SGVsbG8=",
            "flag": true,
            "nothing": null,
        });

        let prefs = normalize_json_map(root);
        assert_eq!(prefs["count"], PrefValue::I32(7));
        assert_eq!(prefs["wide"], PrefValue::I64(9_000_000_000));
        assert_eq!(prefs["ratio"], PrefValue::F32(0.5));
        assert_eq!(prefs["blob"], PrefValue::Str("Hello".to_string()));
        assert_eq!(prefs["flag"], PrefValue::Bool(true));
        assert_eq!(prefs["nothing"], PrefValue::Null);
    }

    #[test]
    fn test_nested_containers() {
        let root = json!({ "outer": { "inner": [1, 2.5, "x"] } });
        let prefs = normalize_json_map(root);

        match &prefs["outer"] {
            PrefValue::Dict(inner) => match &inner["inner"] {
                PrefValue::List(items) => {
                    assert_eq!(items[0], PrefValue::I32(1));
                    assert_eq!(items[1], PrefValue::F32(2.5));
                    assert_eq!(items[2], PrefValue::Str("x".to_string()));
                }
                other => panic!("expected list, got {:?}", other),
            },
            other => panic!("expected dict, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root_is_empty() {
        assert!(normalize_json_map(json!([1, 2, 3])).is_empty());
        assert!(normalize_json_map(json!("text")).is_empty());
    }
}
