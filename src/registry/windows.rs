//! Registry enumeration over raw Win32 calls
//!
//! Reads every value under one HKCU subkey with `RegEnumValueW`, growing the
//! name and data buffers whenever the API reports `ERROR_MORE_DATA` and
//! retrying the same index. The key handle is closed on every exit path via
//! an RAII guard.

use super::decode::{decode_value, normalize_name, RawValue};
use crate::value::PrefsMap;
use tracing::{debug, warn};
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS};
use windows::Win32::System::Registry::{
    RegCloseKey, RegEnumValueW, RegOpenKeyExW, HKEY, HKEY_CURRENT_USER, KEY_READ, REG_VALUE_TYPE,
};

const INITIAL_NAME_CAPACITY: usize = 256;
const INITIAL_DATA_CAPACITY: usize = 1024;

/// Open registry key, closed on drop.
struct KeyHandle(HKEY);

impl Drop for KeyHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Read every value under `Software\...` in the current user's hive.
///
/// An absent or inaccessible key is not an error, just "no preferences
/// yet". A failure mid-enumeration ends the scan with partial results.
pub fn read_all(subkey: &str) -> PrefsMap {
    let mut prefs = PrefsMap::new();
    let wide_subkey = to_wide(subkey);

    let mut hkey = HKEY::default();
    let open_result = unsafe {
        RegOpenKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR(wide_subkey.as_ptr()),
            0,
            KEY_READ,
            &mut hkey,
        )
    };

    if open_result != ERROR_SUCCESS {
        warn!(subkey, "registry key not found or inaccessible");
        return prefs;
    }

    let key = KeyHandle(hkey);
    enumerate_values(&key, &mut prefs);
    prefs
}

fn enumerate_values(key: &KeyHandle, prefs: &mut PrefsMap) {
    let mut name_buf: Vec<u16> = vec![0; INITIAL_NAME_CAPACITY];
    let mut data_buf: Vec<u8> = vec![0; INITIAL_DATA_CAPACITY];

    for index in 0.. {
        loop {
            let mut name_len = name_buf.len() as u32;
            let mut data_len = data_buf.len() as u32;
            let mut kind = REG_VALUE_TYPE::default();

            let result = unsafe {
                RegEnumValueW(
                    key.0,
                    index,
                    PWSTR(name_buf.as_mut_ptr()),
                    &mut name_len,
                    None,
                    Some(&mut kind as *mut REG_VALUE_TYPE as *mut _),
                    Some(data_buf.as_mut_ptr()),
                    Some(&mut data_len as *mut u32),
                )
            };

            if result == ERROR_MORE_DATA {
                // Grow both buffers to the reported sizes and retry the
                // same index. The name size is not always reported, so the
                // name buffer at least doubles.
                let needed_name = (name_len as usize + 1).max(name_buf.len() * 2);
                name_buf.resize(needed_name, 0);
                if data_len as usize > data_buf.len() {
                    data_buf.resize(data_len as usize, 0);
                }
                continue;
            }

            if result == ERROR_NO_MORE_ITEMS {
                debug!(count = prefs.len(), "registry enumeration complete");
                return;
            }

            if result != ERROR_SUCCESS {
                warn!(
                    index,
                    code = result.0,
                    "registry enumeration failed, returning partial results"
                );
                return;
            }

            let raw_name = String::from_utf16_lossy(&name_buf[..name_len as usize]);
            let name = normalize_name(&raw_name);

            let raw = RawValue {
                kind: kind.0,
                data: data_buf[..data_len as usize].to_vec(),
            };

            match decode_value(&raw) {
                Ok(value) => {
                    prefs.insert(name, value);
                }
                Err(err) => {
                    warn!(name = %raw_name, %err, "skipping undecodable registry value");
                }
            }

            break;
        }
    }
}
