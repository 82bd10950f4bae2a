//! Facade over the platform fetchers
//!
//! [`PrefsReader`] is the single entry point callers use. It probes for the
//! platform fetcher lazily, exactly once, and reuses that instance for the
//! lifetime of the reader; results themselves are never cached, so every
//! call observes the store fresh.

use crate::config::ReaderConfig;
use crate::entry::{sorted_entries, PrefEntry};
use crate::fetcher::Fetcher;
use crate::value::PrefsMap;
use parking_lot::RwLock;
use tracing::{info, warn};

/// Cross-platform preference reader.
pub struct PrefsReader {
    config: ReaderConfig,
    /// Memoized fetcher; populated on first use, reused forever. No
    /// teardown needed, fetchers hold no resources between calls.
    fetcher: RwLock<Option<Fetcher>>,
}

impl PrefsReader {
    /// Create a reader for the given application identity.
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            fetcher: RwLock::new(None),
        }
    }

    /// Create a reader with a pre-selected fetcher, bypassing the probe.
    #[cfg(test)]
    pub(crate) fn with_fetcher(config: ReaderConfig, fetcher: Fetcher) -> Self {
        Self {
            config,
            fetcher: RwLock::new(Some(fetcher)),
        }
    }

    /// Read the entire preference store.
    ///
    /// Failures are logged and collapse to an empty map; callers observe
    /// only "zero preferences found". A caller wanting a fresh read simply
    /// calls again.
    pub fn get_all_prefs(&self) -> PrefsMap {
        match self.try_get_all_prefs() {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "preference fetch failed, returning empty map");
                PrefsMap::new()
            }
        }
    }

    /// Read the entire preference store, keeping the failure reason.
    ///
    /// [`get_all_prefs`](Self::get_all_prefs) cannot distinguish "no
    /// preferences exist" from "read failed"; this variant can.
    pub fn try_get_all_prefs(&self) -> crate::Result<PrefsMap> {
        self.ensure_fetcher();

        let guard = self.fetcher.read();
        // Populated by ensure_fetcher just above.
        let fetcher = guard.as_ref().expect("fetcher initialized");

        let prefs = fetcher.fetch()?;
        info!(count = prefs.len(), "retrieved preference entries");
        Ok(prefs)
    }

    /// Dump every preference to the diagnostic log.
    pub fn log_all_prefs(&self) {
        let prefs = self.get_all_prefs();
        for (key, value) in &prefs {
            info!(key = %key, kind = value.type_name(), value = %value, "pref");
        }
        info!(count = prefs.len(), "preference dump complete");
    }

    /// Read the store and project it into name-sorted display entries.
    pub fn entries(&self) -> Vec<PrefEntry> {
        sorted_entries(&self.get_all_prefs())
    }

    /// The configuration this reader was built with.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn ensure_fetcher(&self) {
        if self.fetcher.read().is_some() {
            return;
        }

        let mut slot = self.fetcher.write();
        if slot.is_none() {
            *slot = Some(Fetcher::probe(&self.config));
        }
    }
}
