//! Legacy locale keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A locale served by the legacy control-panel documents.
///
/// Each locale maps to one document, and the document shape depends on the
/// locale: `US` and `KR` share the English layout, `JP` has its own.
///
/// # Examples
///
/// ```
/// use pvc_core::{LegacySchema, Locale};
///
/// let locale = Locale::from_key(" jp ").unwrap();
/// assert_eq!(locale, Locale::Jp);
/// assert_eq!(locale.legacy_file_name(), "c1ControlPanelJP.json");
/// assert_eq!(locale.schema(), LegacySchema::Jp);
///
/// assert!(Locale::from_key("CN").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Locale {
    /// English (`US`).
    Us,
    /// Japanese (`JP`).
    Jp,
    /// Korean (`KR`).
    Kr,
}

/// Document layout of a legacy locale file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacySchema {
    /// `Editions` / `Products` layout used by `US` and `KR`.
    EnKr,
    /// Container-keyed layout used by `JP`.
    Jp,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Self; 3] = [Self::Us, Self::Jp, Self::Kr];

    /// Parses a locale key. Surrounding whitespace and case are ignored.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.key().eq_ignore_ascii_case(key))
    }

    /// Canonical upper-case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Jp => "JP",
            Self::Kr => "KR",
        }
    }

    /// File name of the legacy document for this locale.
    #[must_use]
    pub const fn legacy_file_name(self) -> &'static str {
        match self {
            Self::Us => "c1ControlPanelEN.json",
            Self::Jp => "c1ControlPanelJP.json",
            Self::Kr => "c1ControlPanelKR.json",
        }
    }

    /// Layout of this locale's legacy document.
    #[must_use]
    pub const fn schema(self) -> LegacySchema {
        match self {
            Self::Us | Self::Kr => LegacySchema::EnKr,
            Self::Jp => LegacySchema::Jp,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key() {
        assert_eq!(Locale::from_key("US"), Some(Locale::Us));
        assert_eq!(Locale::from_key("kr"), Some(Locale::Kr));
        assert_eq!(Locale::from_key("  Jp\t"), Some(Locale::Jp));
        assert_eq!(Locale::from_key("CN"), None);
        assert_eq!(Locale::from_key(""), None);
    }

    #[test]
    fn test_schema() {
        assert_eq!(Locale::Us.schema(), LegacySchema::EnKr);
        assert_eq!(Locale::Kr.schema(), LegacySchema::EnKr);
        assert_eq!(Locale::Jp.schema(), LegacySchema::Jp);
    }

    #[test]
    fn test_file_names_are_distinct() {
        let names: Vec<_> = Locale::ALL.iter().map(|l| l.legacy_file_name()).collect();
        assert_eq!(
            names,
            ["c1ControlPanelEN.json", "c1ControlPanelJP.json", "c1ControlPanelKR.json"]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Locale::Kr.to_string(), "KR");
    }
}
