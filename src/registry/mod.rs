//! Windows registry backend
//!
//! Unity's Windows player stores PlayerPrefs as registry values under the
//! current user's hive. This module splits the work in two:
//!
//! - [`decode`]: pure interpretation of raw (type-tag, bytes) slots into
//!   canonical values, portable and unit-tested everywhere
//! - [`windows`]: the enumeration loop over `RegEnumValueW` with growable
//!   buffers, compiled only on Windows

pub mod decode;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::read_all;

pub use decode::{decode_value, strip_hash_suffix, DecodeError, RawValue};
