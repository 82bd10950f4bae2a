//! Property list parsing
//!
//! Unity's macOS player persists PlayerPrefs as a plist under
//! `~/Library/Preferences`, in either XML or binary encoding. The XML
//! grammar is interpreted directly with a recursive walk over the element
//! tree; binary plists are converted to JSON by `plutil` and pushed through
//! the value normalizer.
//!
//! A missing file or an unavailable converter is absence, not an error.
//! Structural failures (malformed XML, missing root dictionary) surface as
//! [`PlistError`] so the fetcher layer can log and degrade to empty.

use crate::normalize::normalize_json_map;
use crate::value::{PrefValue, PrefsMap};
use base64::prelude::{Engine, BASE64_STANDARD};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Magic prefix identifying the binary plist encoding.
const BINARY_PLIST_MAGIC: &[u8; 6] = b"bplist";

/// Converter used for binary plists. Only present on macOS.
const PLUTIL_PATH: &str = "/usr/bin/plutil";

/// Structural plist failures.
#[derive(Debug, thiserror::Error)]
pub enum PlistError {
    /// File could not be read
    #[error("failed to read plist: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not well-formed XML
    #[error("malformed plist XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Well-formed XML, but no `plist/dict` root
    #[error("plist file does not contain a root dictionary")]
    MissingRootDict,

    /// Converter produced output that is not a JSON document
    #[error("converter output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Directory holding Unity preference files, `~/Library/Preferences`.
///
/// `None` when no home directory can be determined.
pub fn preferences_dir() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join("Library/Preferences"))
}

/// Resolve the PlayerPrefs plist path inside a preferences directory.
///
/// Prefers the primary `unity.{company}.{product}.plist` name, falling back
/// to the legacy `.playerprefs` name when the primary file does not exist.
/// The check runs against the file system every time, so a primary file
/// that appears later wins over the legacy one on the next read.
pub fn resolve_plist_path(prefs_dir: &Path, company: &str, product: &str) -> PathBuf {
    let primary = prefs_dir.join(format!("unity.{}.{}.plist", company, product));
    if primary.exists() {
        return primary;
    }

    prefs_dir.join(format!("unity.{}.{}.playerprefs", company, product))
}

/// Read a full preference map from a plist file.
///
/// A missing file yields an empty map. Binary plists go through `plutil`;
/// an absent tool, non-zero exit, or empty output also yield an empty map
/// (logged). Only structural decode failures return an error.
pub fn read_player_prefs(path: &Path) -> Result<PrefsMap, PlistError> {
    if !path.exists() {
        warn!(path = %path.display(), "plist not found");
        return Ok(PrefsMap::new());
    }

    let bytes = std::fs::read(path)?;

    if is_binary_plist(&bytes) {
        debug!(path = %path.display(), "detected binary plist");
        let json = match convert_binary_to_json(path) {
            Some(json) => json,
            None => return Ok(PrefsMap::new()),
        };
        let root: serde_json::Value = serde_json::from_str(&json)?;
        return Ok(normalize_json_map(root));
    }

    debug!(path = %path.display(), "detected XML plist");
    parse_xml(&bytes)
}

fn is_binary_plist(bytes: &[u8]) -> bool {
    bytes.len() >= BINARY_PLIST_MAGIC.len() && bytes.starts_with(BINARY_PLIST_MAGIC)
}

/// Shell out to `plutil -convert json -o - <path>`, fully draining output.
///
/// `None` covers every non-structural failure: tool missing, spawn failure,
/// non-zero exit, empty stdout. No timeout is enforced; a converter hang
/// blocks the calling thread.
fn convert_binary_to_json(path: &Path) -> Option<String> {
    if !Path::new(PLUTIL_PATH).exists() {
        warn!("plutil is not available, cannot convert binary plist");
        return None;
    }

    let output = match Command::new(PLUTIL_PATH)
        .args(["-convert", "json", "-o", "-"])
        .arg(path)
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            warn!(%err, "failed to launch plutil");
            return None;
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        warn!(code = ?output.status.code(), %stderr, "plutil failed");
        return None;
    }
    if !stderr.is_empty() {
        warn!(%stderr, "plutil reported");
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.is_empty() {
        warn!("plutil produced no output");
        return None;
    }

    Some(stdout)
}

fn parse_xml(bytes: &[u8]) -> Result<PrefsMap, PlistError> {
    let text = String::from_utf8_lossy(bytes);
    let document = roxmltree::Document::parse(&text)?;

    let root = document.root_element();
    if !root.has_tag_name("plist") {
        return Err(PlistError::MissingRootDict);
    }

    let root_dict = root
        .children()
        .filter(|node| node.is_element())
        .find(|node| node.has_tag_name("dict"))
        .ok_or(PlistError::MissingRootDict)?;

    Ok(parse_dict(root_dict))
}

/// Interpret a `<dict>` element. Children alternate key-element then
/// value-element; non-key elements preceding a key are skipped, and each
/// key pairs with its immediately following sibling element.
fn parse_dict(dict: roxmltree::Node<'_, '_>) -> IndexMap<String, PrefValue> {
    let mut result = IndexMap::new();
    let mut children = dict.children().filter(|node| node.is_element());

    while let Some(node) = children.next() {
        if !node.tag_name().name().eq_ignore_ascii_case("key") {
            continue;
        }

        let key = element_text(&node);
        if key.is_empty() {
            continue;
        }

        let Some(value_node) = children.next() else {
            break;
        };

        result.insert(key, parse_value(value_node));
    }

    result
}

/// Interpret one plist value element by tag name.
fn parse_value(node: roxmltree::Node<'_, '_>) -> PrefValue {
    let tag = node.tag_name().name().to_ascii_lowercase();
    match tag.as_str() {
        "string" => PrefValue::Str(element_text(&node)),
        "integer" => {
            let parsed = element_text(&node).trim().parse::<i64>().unwrap_or(0);
            PrefValue::from_i64(parsed)
        }
        "real" => {
            let parsed = element_text(&node).trim().parse::<f64>().unwrap_or(0.0);
            PrefValue::from_f64(parsed)
        }
        "true" => PrefValue::Bool(true),
        "false" => PrefValue::Bool(false),
        "data" => decode_data_element(element_text(&node)),
        "dict" => PrefValue::Dict(parse_dict(node)),
        "array" => PrefValue::List(
            node.children()
                .filter(|child| child.is_element())
                .map(parse_value)
                .collect(),
        ),
        _ => PrefValue::Str(element_text(&node)),
    }
}

/// `<data>` holds base64; decode to UTF-8 text when clean, otherwise keep
/// the raw base64 text.
fn decode_data_element(text: String) -> PrefValue {
    let compact: String = text.split_whitespace().collect();
    match BASE64_STANDARD.decode(&compact) {
        Ok(bytes) => {
            let decoded = String::from_utf8_lossy(&bytes);
            if decoded.contains('\u{FFFD}') {
                PrefValue::Str(text)
            } else {
                PrefValue::Str(decoded.into_owned())
            }
        }
        Err(_) => PrefValue::Str(text),
    }
}

fn element_text(node: &roxmltree::Node<'_, '_>) -> String {
    node.text().unwrap_or_default().to_string()
}
