//! Mock preference store for tests
//!
//! An in-memory stand-in for a platform preference store, usable anywhere a
//! real fetcher would be.

use crate::value::{PrefValue, PrefsMap};
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared in-memory preference store.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    prefs: Arc<RwLock<PrefsMap>>,
}

impl MockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one preference.
    pub fn set(&self, key: &str, value: PrefValue) {
        self.prefs.write().insert(key.to_string(), value);
    }

    /// Copy out the current contents, as a fetch would.
    pub fn snapshot(&self) -> PrefsMap {
        self.prefs.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store() {
        let store = MockStore::new();
        store.set("A", PrefValue::I32(1));
        store.set("B", PrefValue::Str("x".into()));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["A"], PrefValue::I32(1));

        // Snapshots are copies; later writes do not affect them.
        store.set("C", PrefValue::Bool(true));
        assert_eq!(snapshot.len(), 2);
    }
}
