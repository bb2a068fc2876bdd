//! Catalog readers and reconciliation for the product version catalogue.
//!
//! Two generations of catalog data describe the same products:
//!
//! - legacy control-panel documents, one per locale ([`LegacyReader`])
//! - per-region release documents listed by a manifest ([`ReleaseReader`])
//!
//! [`merge_catalogs`] reconciles the two into one list, and
//! [`CatalogService`] ties the readers, the merge and an optional
//! [`ReleaseSync`] check together.
//!
//! # Architecture
//!
//! ```text
//! CatalogService
//!     │
//!     ├── LegacyReader ── LegacyStore (directory or in-memory)
//!     │       │
//!     │       └── EN/KR or JP layout, picked by locale
//!     │
//!     ├── ReleaseSync (optional, e.g. LocalSync)
//!     │
//!     ├── ReleaseReader (manifest + releases, rayon)
//!     │
//!     └── merge_catalogs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use pvc_reader::{CatalogService, CatalogSummary, LegacyReader, LegacyStore, ReleaseReader};
//!
//! let service = CatalogService::new(
//!     LegacyReader::new(LegacyStore::directory("/opt/c1/legacy")),
//!     ReleaseReader::new(),
//! );
//!
//! let products = service.read_merged_catalog(Utf8Path::new("/var/lib/c1/version_data"), "US")?;
//! println!("{}", CatalogSummary::from_products(&products));
//! # Ok::<(), pvc_reader::CatalogError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod document;
mod error;
mod legacy;
mod merge;
mod provider;
mod release;
mod summary;
mod sync;

#[cfg(test)]
mod testutil;

pub use error::CatalogError;
pub use legacy::{LegacyReader, LegacyStore};
pub use merge::merge_catalogs;
pub use provider::{CatalogQuery, ProductVersionProvider};
pub use release::{DEFAULT_MANIFEST_FILE, ReleaseRead, ReleaseReader, SkipReason, SkippedRelease};
pub use summary::CatalogSummary;
pub use sync::{DEFAULT_CHECKSUM_FILE, LocalSync, ReleaseSync, SyncPlan};

use camino::Utf8Path;
use pvc_core::{Config, Product};
use tracing::{info, warn};

use crate::provider::require;

/// Reads legacy, release and merged catalogs.
///
/// Every read goes back to the files; nothing is cached between calls.
#[derive(Debug)]
pub struct CatalogService {
    legacy: LegacyReader,
    releases: ReleaseReader,
    sync: Option<Box<dyn ReleaseSync>>,
}

impl CatalogService {
    /// Creates a service without a sync check.
    #[must_use]
    pub fn new(legacy: LegacyReader, releases: ReleaseReader) -> Self {
        Self {
            legacy,
            releases,
            sync: None,
        }
    }

    /// Creates a service from configuration.
    ///
    /// Legacy documents come from `legacy.directory`; the manifest name from
    /// `sync.manifest_file`. No sync check is installed.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Config`] when `config` fails [`Config::validate`].
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        config.validate()?;
        Ok(Self::new(
            LegacyReader::new(LegacyStore::directory(config.legacy.directory.clone())),
            ReleaseReader::new().with_manifest_file(config.sync.manifest_file.clone()),
        ))
    }

    /// Runs `sync` before every release read.
    #[must_use]
    pub fn with_sync(mut self, sync: impl ReleaseSync + 'static) -> Self {
        self.sync = Some(Box::new(sync));
        self
    }

    /// Reads the legacy catalog of a locale.
    ///
    /// # Errors
    ///
    /// See [`LegacyReader::read`].
    pub fn read_legacy_catalog(&self, locale_key: &str) -> Result<Vec<Product>, CatalogError> {
        self.legacy.read(locale_key)
    }

    /// Reads the release catalog of a region, after the sync check if one is
    /// installed.
    ///
    /// # Errors
    ///
    /// See [`ReleaseReader::read`]; also whatever the sync check reports.
    pub fn read_new_catalog(&self, local_root: &Utf8Path, region_key: &str) -> Result<Vec<Product>, CatalogError> {
        self.check_sync(local_root, region_key)?;
        self.releases.read(local_root, region_key)
    }

    /// Like [`read_new_catalog`](Self::read_new_catalog), also reporting
    /// skipped releases.
    ///
    /// # Errors
    ///
    /// Same as [`read_new_catalog`](Self::read_new_catalog).
    pub fn read_new_catalog_with_report(
        &self,
        local_root: &Utf8Path,
        region_key: &str,
    ) -> Result<ReleaseRead, CatalogError> {
        self.check_sync(local_root, region_key)?;
        self.releases.read_with_report(local_root, region_key)
    }

    /// Reads both catalogs for a region and merges them.
    ///
    /// `region_key` selects both the legacy locale and the release region.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidArgument`] when either argument is blank;
    /// otherwise the first error of the legacy read or the release read.
    pub fn read_merged_catalog(
        &self,
        local_root: &Utf8Path,
        region_key: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        require("local_root", local_root.as_str())?;
        let region = require("region_key", region_key)?;

        let legacy = self.read_legacy_catalog(region)?;
        let release = self.read_new_catalog(local_root, region)?;
        let merged = merge_catalogs(&legacy, &release);

        info!(region, products = merged.len(), "Read merged catalog");
        Ok(merged)
    }

    /// The plan of the installed sync check, or `None` without one.
    ///
    /// # Errors
    ///
    /// Whatever the sync check reports.
    pub fn sync_plan(&self, local_root: &Utf8Path, region_key: &str) -> Result<Option<SyncPlan>, CatalogError> {
        self.sync
            .as_ref()
            .map(|sync| sync.ensure_current(local_root, region_key))
            .transpose()
    }

    fn check_sync(&self, local_root: &Utf8Path, region_key: &str) -> Result<(), CatalogError> {
        if let Some(plan) = self.sync_plan(local_root, region_key)? {
            if !plan.is_current() {
                warn!(
                    stale = plan.stale.len(),
                    missing = plan.missing.len(),
                    "Local release data is not current"
                );
            }
        }
        Ok(())
    }
}

impl ProductVersionProvider for CatalogService {
    fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        self.read_merged_catalog(query.require_root()?, query.require_region()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ReleaseFixture;
    use pvc_core::VersionSource;
    use serde_json::json;

    const LEGACY_EN: &str = r#"{"Editions": [
        {"Name": "WinForms", "Description": "Windows Forms controls",
         "Versions": [{"Version": "1.0", "DisplayVersion": "legacy 1.0"},
                      {"Version": "0.9", "DisplayVersion": "legacy 0.9"}]},
        {"Name": "Common", "LatestVersion": "20251.1.710"}
    ]}"#;

    fn service() -> CatalogService {
        CatalogService::new(
            LegacyReader::new(LegacyStore::in_memory().with_document("c1ControlPanelEN.json", LEGACY_EN)),
            ReleaseReader::new(),
        )
    }

    fn fixture() -> ReleaseFixture {
        let fx = ReleaseFixture::new("US");
        fx.manifest(&json!([{"Id": "2026v1", "Sha256": "abc"}]))
            .release(
                "2026v1",
                &json!([
                    {"id": "WinForms", "name": "WinForms",
                     "versions": [{"version": "1.0", "displayVersion": "new 1.0"}]},
                    {"id": "Blazor", "name": "Blazor", "versions": {"version": "2026v1(5)"}}
                ]),
            );
        fx
    }

    #[test]
    fn test_read_merged_catalog() {
        let fx = fixture();
        let products = service().read_merged_catalog(&fx.root, "us").unwrap();

        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Blazor", "WinForms"]);

        let winforms = &products[1];
        assert_eq!(winforms.id, "winforms");
        let versions: Vec<_> = winforms
            .versions
            .iter()
            .map(|v| (v.version.as_deref().unwrap_or_default(), v.display_version.as_deref(), v.source))
            .collect();
        assert_eq!(
            versions,
            [
                ("1.0", Some("new 1.0"), VersionSource::NewJson),
                ("0.9", Some("legacy 0.9"), VersionSource::OldJson),
            ]
        );

        let summary = CatalogSummary::from_products(&products);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.new_source_versions, 2);
        assert_eq!(summary.legacy_only_versions, 1);
    }

    #[test]
    fn test_read_merged_catalog_blank_arguments() {
        let service = service();
        assert!(matches!(
            service.read_merged_catalog(Utf8Path::new(""), "US"),
            Err(CatalogError::InvalidArgument { name: "local_root", .. })
        ));
        assert!(matches!(
            service.read_merged_catalog(Utf8Path::new("/data"), " "),
            Err(CatalogError::InvalidArgument { name: "region_key", .. })
        ));
    }

    #[test]
    fn test_read_merged_catalog_unsupported_locale() {
        let fx = ReleaseFixture::new("CN");
        fx.manifest(&json!([]));
        let err = service().read_merged_catalog(&fx.root, "CN").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedLocale(_)));
    }

    #[test]
    fn test_read_merged_catalog_missing_manifest() {
        let fx = ReleaseFixture::new("US");
        let err = service().read_merged_catalog(&fx.root, "US").unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }

    #[test]
    fn test_sync_plan_with_local_sync() {
        let fx = fixture();
        fx.checksum("2026v1", "ABC");

        assert!(service().sync_plan(&fx.root, "US").unwrap().is_none());

        let service = service().with_sync(LocalSync::new());
        let plan = service.sync_plan(&fx.root, "US").unwrap().unwrap();
        assert!(plan.is_current());
        assert_eq!(plan.up_to_date, ["2026v1"]);

        let products = service.read_new_catalog(&fx.root, "US").unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_provider_reads_merged() {
        let fx = fixture();
        let provider: &dyn ProductVersionProvider = &service();
        let products = provider.products(&CatalogQuery::new(fx.root.clone(), "US")).unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_from_config() {
        let fx = fixture();
        let legacy_dir = fx.root.join("legacy");
        fx.write_file("legacy/c1ControlPanelEN.json", LEGACY_EN);

        let mut config = Config::default();
        config.legacy.directory = legacy_dir;
        let products = CatalogService::from_config(&config)
            .unwrap()
            .read_merged_catalog(&fx.root, "US")
            .unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = Config::default();
        config.sync.manifest_file = " ".to_owned();
        let err = CatalogService::from_config(&config).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));

        let mut config = Config::default();
        config.legacy.directory = "/nonexistent/legacy/dir".into();
        let err = CatalogService::from_config(&config).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }
}
