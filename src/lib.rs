//! prefs-dump: cross-platform PlayerPrefs reader for Unity games
//!
//! This library reads a Unity application's local PlayerPrefs store on
//! whatever platform it finds itself on and normalizes the result into one
//! typed key/value map, suitable for a runtime inspector or diagnostic dump.
//!
//! # Architecture
//!
//! - **Value model**: canonical tagged union every backend decodes into
//! - **Normalizer**: width collapsing and base64/float recovery heuristics
//! - **Registry reader**: raw Win32 enumeration of the HKCU preference keys
//! - **Plist parser**: XML plists walked directly, binary plists via plutil
//! - **Fetchers**: one capability per platform (registry, plist, bridges)
//! - **Facade**: probes the platform once and exposes `get_all_prefs()`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod entry;
pub mod fetcher;
pub mod normalize;
pub mod plist;
pub mod registry;
pub mod reader;
pub mod value;

// Re-export the public surface
pub use config::{Environment, ReaderConfig};
pub use entry::{sorted_entries, PrefEntry};
pub use reader::PrefsReader;
pub use value::{PrefValue, PrefsMap};

/// Result type used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for prefs-dump
///
/// Returned by [`PrefsReader::try_get_all_prefs`]; the `#[from]`
/// conversions also let downstream callers mix the lower-level parser
/// results with `?`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fetch-level error
    #[error("fetch error: {0}")]
    Fetch(#[from] fetcher::FetchError),

    /// Plist parse error
    #[error("plist error: {0}")]
    Plist(#[from] plist::PlistError),

    /// Registry decode error
    #[error("registry error: {0}")]
    Registry(#[from] registry::DecodeError),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging for the library
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prefs_dump=info")),
        )
        .with_target(false)
        .init();
}
