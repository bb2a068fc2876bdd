//! Configuration structures for the product version catalogue.
//!
//! This module provides configuration types for all components of the application:
//!
//! - [`CatalogConfig`] - Where new-schema release data lives and which region to read
//! - [`LegacyConfig`] - Where the legacy control-panel documents live
//! - [`SyncConfig`] - File names used by the release synchronisation boundary
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`], and missing fields in a
//! configuration file fall back to those defaults.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for reading the new-schema catalog.
///
/// # Examples
///
/// ```
/// use pvc_core::CatalogConfig;
///
/// let config = CatalogConfig::default();
/// assert_eq!(config.region, "US");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Root directory holding one sub-directory per region.
    pub local_root: Utf8PathBuf,

    /// Region key used when none is given explicitly (e.g. "US", "JP").
    pub region: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            local_root: Utf8PathBuf::new(),
            region: "US".to_owned(),
        }
    }
}

/// Configuration for the legacy control-panel documents.
///
/// The legacy documents used to be compiled into the installer. Here their
/// location is an explicit setting handed to the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Directory containing `c1ControlPanelEN.json`, `c1ControlPanelJP.json`
    /// and `c1ControlPanelKR.json`.
    pub directory: Utf8PathBuf,
}

/// File names used when checking whether local release data is current.
///
/// # Examples
///
/// ```
/// use pvc_core::SyncConfig;
///
/// let config = SyncConfig::default();
/// assert_eq!(config.manifest_file, "ReleaseVersion.json");
/// assert_eq!(config.checksum_file, "sha256.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Name of the per-region release manifest.
    pub manifest_file: String,

    /// Name of the checksum file stored next to each release document.
    pub checksum_file: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            manifest_file: "ReleaseVersion.json".to_owned(),
            checksum_file: "sha256.txt".to_owned(),
        }
    }
}

/// Root configuration for the catalogue tools.
///
/// # Examples
///
/// ```
/// use pvc_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"catalog": {"region": "JP"}}"#).unwrap();
/// assert_eq!(config.catalog.region, "JP");
/// assert_eq!(config.sync.checksum_file, "sha256.txt");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// New-schema catalog settings.
    pub catalog: CatalogConfig,

    /// Legacy document settings.
    pub legacy: LegacyConfig,

    /// Synchronisation boundary settings.
    pub sync: SyncConfig,
}

impl Config {
    /// Loads a configuration file (JSON) and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON for this structure, and
    /// the errors of [`Config::validate`] otherwise.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_std_path())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot check on its own.
    ///
    /// Paths are allowed to be empty (the CLI fills them in later), but a
    /// non-empty legacy directory must exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.region.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "catalog.region",
                "must not be empty",
            ));
        }
        if self.sync.manifest_file.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "sync.manifest_file",
                "must not be empty",
            ));
        }
        if self.sync.checksum_file.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "sync.checksum_file",
                "must not be empty",
            ));
        }

        let legacy_dir = &self.legacy.directory;
        if !legacy_dir.as_str().is_empty() && !legacy_dir.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: legacy_dir.clone(),
                reason: "legacy directory does not exist".to_owned(),
            });
        }

        Ok(())
    }
}
