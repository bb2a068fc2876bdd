//! Loading JSON documents from disk.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use pvc_core::text::eq_ignore_case;
use serde_json::Value;

use crate::error::CatalogError;

/// Reads and parses a JSON file.
///
/// A missing file maps to [`CatalogError::FileNotFound`], unparsable content
/// to [`CatalogError::MalformedJson`].
pub(crate) fn read_json(path: &Utf8Path) -> Result<Value, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CatalogError::FileNotFound(path.to_owned()),
        _ => CatalogError::io(path, e),
    })?;
    parse_json(path, &text)
}

/// `parent/name`, matching `name` against the entries of `parent` ignoring
/// case when the exact path does not exist.
///
/// Several case-insensitive matches resolve to the first in file-name order.
/// With no match, or an unreadable `parent`, the exact path is returned so
/// the caller reports it as missing.
pub(crate) fn resolve_ignore_case(parent: &Utf8Path, name: &str) -> Utf8PathBuf {
    let exact = parent.join(name);
    if exact.exists() {
        return exact;
    }
    let Ok(entries) = parent.read_dir_utf8() else {
        return exact;
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_owned())
        .filter(|entry| eq_ignore_case(entry, name))
        .min()
        .map_or(exact, |found| parent.join(found))
}

/// Parses JSON text, attributing failures to `origin`.
pub(crate) fn parse_json(origin: &Utf8Path, text: &str) -> Result<Value, CatalogError> {
    // Files written by Windows tooling often start with a BOM.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    serde_json::from_str(text).map_err(|e| CatalogError::malformed(origin, e))
}
