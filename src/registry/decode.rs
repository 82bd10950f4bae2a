//! Registry value decoding
//!
//! Interpretation of raw registry slots into [`PrefValue`]s. The encodings
//! here are Unity quirks as much as registry conventions: floats are stored
//! either as REG_SZ decimal text or as 4-byte REG_BINARY payloads, strings
//! as REG_BINARY with an optional trailing NUL, and colliding value names
//! carry a `_h<digits>` hash suffix that must be stripped for display.

use crate::value::PrefValue;

/// REG_SZ: UTF-16 string with terminator
pub const REG_SZ: u32 = 1;
/// REG_EXPAND_SZ: as REG_SZ, with unexpanded environment references
pub const REG_EXPAND_SZ: u32 = 2;
/// REG_BINARY: free-form bytes
pub const REG_BINARY: u32 = 3;
/// REG_DWORD: 32-bit little-endian integer
pub const REG_DWORD: u32 = 4;
/// REG_QWORD: 64-bit little-endian integer
pub const REG_QWORD: u32 = 11;

/// One raw value slot as returned by registry enumeration, before
/// interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    /// Registry type tag (`REG_*`)
    pub kind: u32,
    /// Payload bytes, already truncated to the reported data length
    pub data: Vec<u8>,
}

/// Why a single slot could not be decoded. The enumeration loop logs these
/// and skips the slot; they never abort a scan.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Type tag this reader does not understand
    #[error("unsupported registry value type {0}")]
    UnsupportedType(u32),

    /// Payload shorter than the type requires
    #[error("registry payload truncated: {expected} bytes required, got {actual}")]
    Truncated {
        /// Minimum bytes the type tag implies
        expected: usize,
        /// Bytes actually present
        actual: usize,
    },

    /// REG_BINARY slot with no payload at all
    #[error("empty registry binary payload")]
    EmptyBinary,
}

/// Strip Unity's `_h<digits>` name-collision suffix from a raw value name.
///
/// The engine disambiguates keys that collide after type-hashing by
/// appending `_h` plus a decimal hash, so `Score_h3404359009` reads back as
/// `Score`.
pub fn strip_hash_suffix(name: &str) -> &str {
    if let Some(pos) = name.rfind("_h") {
        let digits = &name[pos + 2..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return &name[..pos];
        }
    }
    name
}

/// Normalize a raw value name for the preference map: strip the hash
/// suffix, substitute the unnamed sentinel for empty results.
pub fn normalize_name(raw: &str) -> String {
    let stripped = strip_hash_suffix(raw);
    if stripped.is_empty() {
        crate::entry::UNNAMED_SENTINEL.to_string()
    } else {
        stripped.to_string()
    }
}

/// Decode one raw slot by its registry type tag.
pub fn decode_value(raw: &RawValue) -> Result<PrefValue, DecodeError> {
    match raw.kind {
        REG_SZ | REG_EXPAND_SZ => Ok(decode_utf16_string(&raw.data)),
        REG_DWORD => {
            if raw.data.len() < 4 {
                return Err(DecodeError::Truncated {
                    expected: 4,
                    actual: raw.data.len(),
                });
            }
            Ok(PrefValue::I32(bytemuck::pod_read_unaligned(&raw.data[..4])))
        }
        REG_QWORD => {
            if raw.data.len() < 8 {
                return Err(DecodeError::Truncated {
                    expected: 8,
                    actual: raw.data.len(),
                });
            }
            Ok(PrefValue::I64(bytemuck::pod_read_unaligned(&raw.data[..8])))
        }
        REG_BINARY => decode_binary(&raw.data),
        other => Err(DecodeError::UnsupportedType(other)),
    }
}

/// Decode REG_SZ payload: UTF-16LE minus the two-byte terminator. Unity
/// stores some float preferences as registry strings, so a full
/// floating-point parse wins over the string interpretation.
fn decode_utf16_string(data: &[u8]) -> PrefValue {
    if data.len() <= 2 {
        return PrefValue::Str(String::new());
    }

    let wide: Vec<u16> = data[..data.len() - 2]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text = String::from_utf16_lossy(&wide);

    if let Ok(float) = text.trim().parse::<f32>() {
        return PrefValue::F32(float);
    }

    PrefValue::Str(text)
}

/// Decode REG_BINARY payload: a 4-byte blob is a float, otherwise text with
/// one optional trailing NUL, otherwise raw bytes.
fn decode_binary(data: &[u8]) -> Result<PrefValue, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyBinary);
    }

    if data.len() == 4 {
        return Ok(PrefValue::F32(bytemuck::pod_read_unaligned(data)));
    }

    let text_len = if data[data.len() - 1] == 0 {
        data.len() - 1
    } else {
        data.len()
    };

    match std::str::from_utf8(&data[..text_len]) {
        Ok(text) if !text.is_empty() => Ok(PrefValue::Str(text.to_string())),
        _ => Ok(PrefValue::Bytes(data.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_payload(text: &str) -> Vec<u8> {
        let mut bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        bytes.extend_from_slice(&[0, 0]); // terminator
        bytes
    }

    #[test]
    fn test_strip_hash_suffix() {
        assert_eq!(strip_hash_suffix("Score_h3404359009"), "Score");
        assert_eq!(strip_hash_suffix("B_h7"), "B");
        assert_eq!(strip_hash_suffix("NoSuffix"), "NoSuffix");
        assert_eq!(strip_hash_suffix("under_score"), "under_score");
        assert_eq!(strip_hash_suffix("trailing_h"), "trailing_h");
        assert_eq!(strip_hash_suffix("mixed_h1x"), "mixed_h1x");
        assert_eq!(strip_hash_suffix("a_h1_h2"), "a_h1");
        assert_eq!(strip_hash_suffix("_h7"), "");
    }

    #[test]
    fn test_normalize_name_sentinel() {
        assert_eq!(normalize_name(""), "(Unnamed)");
        assert_eq!(normalize_name("_h7"), "(Unnamed)");
        assert_eq!(normalize_name("Key_h1"), "Key");
    }

    #[test]
    fn test_decode_dword() {
        let raw = RawValue {
            kind: REG_DWORD,
            data: 42_i32.to_le_bytes().to_vec(),
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::I32(42));

        let raw = RawValue {
            kind: REG_DWORD,
            data: (-7_i32).to_le_bytes().to_vec(),
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::I32(-7));
    }

    #[test]
    fn test_decode_qword() {
        let raw = RawValue {
            kind: REG_QWORD,
            data: 5_000_000_000_i64.to_le_bytes().to_vec(),
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::I64(5_000_000_000));
    }

    #[test]
    fn test_decode_truncated_integers() {
        let raw = RawValue {
            kind: REG_DWORD,
            data: vec![1, 2],
        };
        assert!(matches!(
            decode_value(&raw),
            Err(DecodeError::Truncated { expected: 4, .. })
        ));

        let raw = RawValue {
            kind: REG_QWORD,
            data: vec![1, 2, 3, 4],
        };
        assert!(matches!(
            decode_value(&raw),
            Err(DecodeError::Truncated { expected: 8, .. })
        ));
    }

    #[test]
    fn test_decode_string() {
        let raw = RawValue {
            kind: REG_SZ,
            data: utf16_payload("hello"),
        };
        assert_eq!(
            decode_value(&raw).unwrap(),
            PrefValue::Str("hello".to_string())
        );
    }

    #[test]
    fn test_decode_string_float_sniff() {
        let raw = RawValue {
            kind: REG_SZ,
            data: utf16_payload("1.5"),
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::F32(1.5));

        // Partial numbers stay strings
        let raw = RawValue {
            kind: REG_SZ,
            data: utf16_payload("1.5abc"),
        };
        assert_eq!(
            decode_value(&raw).unwrap(),
            PrefValue::Str("1.5abc".to_string())
        );
    }

    #[test]
    fn test_decode_empty_string() {
        let raw = RawValue {
            kind: REG_SZ,
            data: vec![0, 0],
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::Str(String::new()));
    }

    #[test]
    fn test_decode_binary_float() {
        let raw = RawValue {
            kind: REG_BINARY,
            data: 2.5_f32.to_le_bytes().to_vec(),
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::F32(2.5));
    }

    #[test]
    fn test_decode_binary_text_with_trailing_nul() {
        let mut data = b"hello".to_vec();
        data.push(0);
        let raw = RawValue {
            kind: REG_BINARY,
            data,
        };
        assert_eq!(
            decode_value(&raw).unwrap(),
            PrefValue::Str("hello".to_string())
        );
    }

    #[test]
    fn test_decode_binary_invalid_utf8_kept_as_bytes() {
        let data = vec![0xFF, 0xFE, 0xFD, 0xFC, 0xFB];
        let raw = RawValue {
            kind: REG_BINARY,
            data: data.clone(),
        };
        assert_eq!(decode_value(&raw).unwrap(), PrefValue::Bytes(data));
    }

    #[test]
    fn test_decode_unsupported_type() {
        let raw = RawValue {
            kind: 99,
            data: vec![1],
        };
        assert!(matches!(
            decode_value(&raw),
            Err(DecodeError::UnsupportedType(99))
        ));
    }
}
