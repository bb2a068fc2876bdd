//! Version provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which input schema produced a version record.
///
/// The merger uses this tag to decide which values win when the same version
/// appears in both the legacy documents and the new release files.
///
/// # Examples
///
/// ```
/// use pvc_core::VersionSource;
///
/// assert!(VersionSource::NewJson.is_new());
/// assert!(!VersionSource::OldJson.is_new());
/// assert_eq!(VersionSource::OldJson.combine(VersionSource::NewJson), VersionSource::NewJson);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    /// Legacy control-panel document.
    #[default]
    OldJson,

    /// Per-region, per-release document.
    NewJson,
}

impl VersionSource {
    /// Returns `true` for [`VersionSource::NewJson`].
    #[inline]
    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::NewJson)
    }

    /// Provenance of a record merged from `self` and `other`.
    ///
    /// `NewJson` if either side is `NewJson`, otherwise `self`.
    #[inline]
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        if self.is_new() || other.is_new() {
            Self::NewJson
        } else {
            self
        }
    }

    /// Returns a human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OldJson => "OldJson",
            Self::NewJson => "NewJson",
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        use VersionSource::{NewJson, OldJson};
        assert_eq!(OldJson.combine(OldJson), OldJson);
        assert_eq!(OldJson.combine(NewJson), NewJson);
        assert_eq!(NewJson.combine(OldJson), NewJson);
        assert_eq!(NewJson.combine(NewJson), NewJson);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&VersionSource::OldJson).unwrap(),
            r#""old_json""#
        );
        assert_eq!(
            serde_json::to_string(&VersionSource::NewJson).unwrap(),
            r#""new_json""#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(VersionSource::NewJson.to_string(), "NewJson");
    }
}
