//! Platform fetchers
//!
//! Each fetcher variant implements one capability: return the full
//! preference map for its platform. The concrete variant is chosen once by
//! [`Fetcher::probe`] from the compile-time platform and the configured
//! environment, then dispatched through a plain `match` — a tagged-variant
//! strategy rather than trait objects.
//!
//! Fetch failures never escape past the facade; the inner `Result` exists
//! so outcomes stay distinguishable at this layer.

use crate::config::ReaderConfig;
use crate::plist::{self, PlistError};
use crate::value::PrefsMap;
use std::path::PathBuf;
use tracing::{debug, warn};

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod apple;
#[cfg(target_os = "android")]
mod android;
#[cfg(test)]
pub mod mock;

/// Why a fetch produced no preferences.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Structural plist failure
    #[error("plist error: {0}")]
    Plist(#[from] PlistError),

    /// Bridge payload was not a valid JSON document
    #[error("bridge JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Native bridge call failed
    #[error("native bridge error: {0}")]
    Bridge(String),

    /// No fetcher exists for the current platform
    #[error("no preference fetcher available for this platform")]
    Unsupported,
}

/// One platform-specific preference reader, selected once per process.
#[derive(Debug)]
pub enum Fetcher {
    /// Windows registry subtree (player or editor path baked in at probe)
    #[cfg(windows)]
    WindowsRegistry {
        /// HKCU subkey holding the application's preferences
        subkey: String,
    },

    /// Plist file on disk (macOS editor / offline reads)
    ApplePlist {
        /// Preferences directory the plist lives in
        prefs_dir: PathBuf,
        /// Company name used in the plist filename
        company: String,
        /// Product name used in the plist filename
        product: String,
    },

    /// Live defaults read through the exported native bridge
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    AppleBridge,

    /// SharedPreferences walk over the JNI bridge
    #[cfg(target_os = "android")]
    Android {
        /// Store name, `{bundle_id}.v2.playerprefs`
        prefs_name: String,
    },

    /// In-memory store for tests
    #[cfg(test)]
    Mock(mock::MockStore),

    /// Probe found nothing usable; every fetch warns and yields empty
    Unsupported,
}

impl Fetcher {
    /// Choose the fetcher for the current platform and environment. Runs
    /// once; the facade caches the result for the process lifetime.
    pub fn probe(config: &ReaderConfig) -> Fetcher {
        #[cfg(windows)]
        {
            return Fetcher::WindowsRegistry {
                subkey: config.registry_subkey(),
            };
        }

        #[cfg(target_os = "macos")]
        {
            if config.environment == crate::config::Environment::Editor {
                return match plist::preferences_dir() {
                    Some(prefs_dir) => Fetcher::ApplePlist {
                        prefs_dir,
                        company: config.company.clone(),
                        product: config.product.clone(),
                    },
                    None => Fetcher::Unsupported,
                };
            }
            return Fetcher::AppleBridge;
        }

        #[cfg(target_os = "ios")]
        {
            return Fetcher::AppleBridge;
        }

        #[cfg(target_os = "android")]
        {
            return Fetcher::Android {
                prefs_name: format!("{}.v2.playerprefs", config.bundle_id),
            };
        }

        #[allow(unreachable_code)]
        {
            let _ = config;
            warn!("no preference fetcher for the current platform");
            Fetcher::Unsupported
        }
    }

    /// Read the entire preference store.
    pub fn fetch(&self) -> Result<PrefsMap, FetchError> {
        match self {
            #[cfg(windows)]
            Fetcher::WindowsRegistry { subkey } => {
                debug!(subkey, "reading preferences from registry");
                Ok(crate::registry::read_all(subkey))
            }

            Fetcher::ApplePlist {
                prefs_dir,
                company,
                product,
            } => {
                // The primary/legacy filename fallback is re-evaluated on
                // every fetch; only the fetcher instance is cached.
                let path = plist::resolve_plist_path(prefs_dir, company, product);
                debug!(path = %path.display(), "reading preferences from plist");
                Ok(plist::read_player_prefs(&path)?)
            }

            #[cfg(any(target_os = "macos", target_os = "ios"))]
            Fetcher::AppleBridge => apple::fetch_via_bridge(),

            #[cfg(target_os = "android")]
            Fetcher::Android { prefs_name } => android::fetch_shared_prefs(prefs_name),

            #[cfg(test)]
            Fetcher::Mock(store) => Ok(store.snapshot()),

            Fetcher::Unsupported => Err(FetchError::Unsupported),
        }
    }
}
