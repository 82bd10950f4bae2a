//! Native defaults bridge for Apple players
//!
//! Packaged macOS and iOS builds link a native shim exporting two entry
//! points: one returning an owned C string of JSON-encoded preferences, one
//! freeing it. Every non-null pointer is freed exactly once, before any
//! parsing can fail.

use super::FetchError;
use crate::normalize::normalize_json_map;
use crate::value::PrefsMap;
use std::ffi::{c_char, CStr};
use tracing::debug;

extern "C" {
    fn GetPlayerPrefsJSON() -> *mut c_char;
    fn FreeMemory(ptr: *mut c_char);
}

pub fn fetch_via_bridge() -> Result<PrefsMap, FetchError> {
    let json = match read_bridge_string() {
        Some(json) => json,
        // Null pointer means no preferences, not a failure.
        None => return Ok(PrefsMap::new()),
    };

    if json.is_empty() {
        debug!("native bridge returned empty JSON");
        return Ok(PrefsMap::new());
    }

    let root: serde_json::Value = serde_json::from_str(&json)?;
    Ok(normalize_json_map(root))
}

/// Copy the bridge's string into process memory and free the native
/// allocation on every path.
fn read_bridge_string() -> Option<String> {
    unsafe {
        let ptr = GetPlayerPrefsJSON();
        if ptr.is_null() {
            return None;
        }

        let copied = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        FreeMemory(ptr);
        Some(copied)
    }
}
