//! Canonical preference value model
//!
//! Every platform backend decodes into [`PrefValue`], a tagged union over the
//! types Unity's PlayerPrefs API can actually persist (plus the containers
//! that show up inside plist files). Integer and float widths follow the
//! engine's own storage: integers that fit in 32 bits stay 32-bit, floats
//! are always single precision.

use indexmap::IndexMap;
use std::fmt;

/// Full preference store contents, keyed by preference name.
///
/// Keys are compared by exact byte sequence. Insertion order follows the
/// backend's enumeration order and carries no meaning; presentation layers
/// re-sort.
pub type PrefsMap = IndexMap<String, PrefValue>;

/// A single decoded preference value, independent of source platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PrefValue {
    /// 32-bit signed integer (the native PlayerPrefs int width)
    I32(i32),
    /// 64-bit signed integer, only used when the value exceeds i32 range
    I64(i64),
    /// Single-precision float (the native PlayerPrefs float width)
    F32(f32),
    /// UTF-8 string
    Str(String),
    /// Boolean (plist `<true/>`/`<false/>` only; PlayerPrefs has no bool)
    Bool(bool),
    /// Raw bytes from a registry binary payload that could not be read as text
    Bytes(Vec<u8>),
    /// Ordered list (plist `<array>`)
    List(Vec<PrefValue>),
    /// Ordered nested dictionary (plist `<dict>`)
    Dict(IndexMap<String, PrefValue>),
    /// Explicitly absent value (Android can store null entries)
    Null,
}

impl PrefValue {
    /// Build an integer value, narrowing to 32-bit when the range permits.
    ///
    /// Narrowing is mandatory for round-trip fidelity: the engine itself
    /// stores 32-bit ints, and a promoted width would not read back.
    pub fn from_i64(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(narrow) => PrefValue::I32(narrow),
            Err(_) => PrefValue::I64(value),
        }
    }

    /// Build a float value, narrowing double precision to single.
    pub fn from_f64(value: f64) -> Self {
        PrefValue::F32(value as f32)
    }

    /// Human-readable tag of this value's variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            PrefValue::I32(_) => "Int32",
            PrefValue::I64(_) => "Int64",
            PrefValue::F32(_) => "Single",
            PrefValue::Str(_) => "String",
            PrefValue::Bool(_) => "Boolean",
            PrefValue::Bytes(_) => "Bytes",
            PrefValue::List(_) => "List",
            PrefValue::Dict(_) => "Dictionary",
            PrefValue::Null => "null",
        }
    }

    /// Whether this value is the explicit null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, PrefValue::Null)
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::I32(v) => write!(f, "{}", v),
            PrefValue::I64(v) => write!(f, "{}", v),
            PrefValue::F32(v) => write!(f, "{}", v),
            PrefValue::Str(v) => f.write_str(v),
            PrefValue::Bool(v) => write!(f, "{}", v),
            PrefValue::Bytes(bytes) => {
                for byte in bytes {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
            PrefValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            PrefValue::Dict(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            PrefValue::Null => f.write_str("(null)"),
        }
    }
}
