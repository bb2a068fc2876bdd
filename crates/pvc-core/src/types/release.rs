//! Release manifest entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::get_non_blank_ci;

/// One entry of a region's `ReleaseVersion.json` manifest.
///
/// Only `Id` is required; the other properties are carried through for the
/// sync plan and for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseEntry {
    /// Release identifier; also the name of the release folder and file.
    pub id: String,

    /// Expected SHA-256 of the release payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Release notes URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_url: Option<String>,

    /// License agreement URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eula: Option<String>,
}

impl ReleaseEntry {
    /// Builds an entry from one manifest element.
    ///
    /// Property names are matched case-insensitively. Returns `None` when the
    /// element is not an object or has no non-blank `Id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pvc_core::ReleaseEntry;
    /// use serde_json::json;
    ///
    /// let entry = ReleaseEntry::from_json(&json!({"id": " 2025v2 ", "Sha256": "ab12"})).unwrap();
    /// assert_eq!(entry.id, "2025v2");
    /// assert_eq!(entry.sha256.as_deref(), Some("ab12"));
    ///
    /// assert!(ReleaseEntry::from_json(&json!({"Id": ""})).is_none());
    /// ```
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = get_non_blank_ci(value, "Id")?.trim().to_owned();
        let field = |name| get_non_blank_ci(value, name).map(|s| s.trim().to_owned());
        Some(Self {
            id,
            sha256: field("Sha256"),
            news_url: field("NewsUrl"),
            eula: field("Eula"),
        })
    }
}
