//! Display projection of preference entries
//!
//! [`PrefEntry`] is the read-only view a panel or log consumer renders: name,
//! type tag, and string value, with sentinels filled in for the awkward
//! cases. It is lossy by design and never fed back into a store.

use crate::value::{PrefValue, PrefsMap};

/// Sentinel shown for entries whose key is empty.
pub const UNNAMED_SENTINEL: &str = "(Unnamed)";

/// A single preference rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefEntry {
    /// Preference key, or `"(Unnamed)"` when empty
    pub name: String,
    /// Human-readable type tag (`Int32`, `Single`, ..., or `"null"`)
    pub kind: String,
    /// String rendering of the value; `"(null)"` when absent, `"(empty)"`
    /// for an empty string
    pub value: String,
}

impl PrefEntry {
    /// Build an entry from one (key, value) pair. `None` and
    /// [`PrefValue::Null`] both render as null.
    pub fn new(name: &str, raw: Option<&PrefValue>) -> Self {
        let name = if name.is_empty() {
            UNNAMED_SENTINEL.to_string()
        } else {
            name.to_string()
        };

        match raw {
            None | Some(PrefValue::Null) => Self {
                name,
                kind: "null".to_string(),
                value: "(null)".to_string(),
            },
            Some(value) => {
                let rendered = value.to_string();
                Self {
                    name,
                    kind: value.type_name().to_string(),
                    value: if rendered.is_empty() {
                        "(empty)".to_string()
                    } else {
                        rendered
                    },
                }
            }
        }
    }
}

/// Project a full preference map into name-sorted display entries.
pub fn sorted_entries(prefs: &PrefsMap) -> Vec<PrefEntry> {
    let mut entries: Vec<PrefEntry> = prefs
        .iter()
        .map(|(key, value)| PrefEntry::new(key, Some(value)))
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_basic() {
        let entry = PrefEntry::new("Score", Some(&PrefValue::I32(100)));
        assert_eq!(entry.name, "Score");
        assert_eq!(entry.kind, "Int32");
        assert_eq!(entry.value, "100");
    }

    #[test]
    fn test_empty_name_sentinel() {
        let entry = PrefEntry::new("", Some(&PrefValue::Str("x".into())));
        assert_eq!(entry.name, "(Unnamed)");
    }

    #[test]
    fn test_null_sentinels() {
        let entry = PrefEntry::new("Key", None);
        assert_eq!(entry.kind, "null");
        assert_eq!(entry.value, "(null)");

        let entry = PrefEntry::new("Key", Some(&PrefValue::Null));
        assert_eq!(entry.kind, "null");
        assert_eq!(entry.value, "(null)");
    }

    #[test]
    fn test_empty_string_sentinel() {
        let entry = PrefEntry::new("Key", Some(&PrefValue::Str(String::new())));
        assert_eq!(entry.kind, "String");
        assert_eq!(entry.value, "(empty)");
    }

    #[test]
    fn test_sorted_entries() {
        let mut prefs = PrefsMap::new();
        prefs.insert("b".to_string(), PrefValue::I32(2));
        prefs.insert("a".to_string(), PrefValue::I32(1));
        prefs.insert("c".to_string(), PrefValue::I32(3));

        let entries = sorted_entries(&prefs);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
