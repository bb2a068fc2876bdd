//! Boundary to the process that keeps local release data current.
//!
//! Fetching release files is not done here. A [`ReleaseSync`] runs before a
//! release read and returns a [`SyncPlan`] describing which releases are
//! current. [`LocalSync`] builds that plan offline by comparing each
//! manifest entry's `Sha256` with the checksum file stored next to the
//! release document.

use std::fmt;
use std::fs;

use camino::Utf8Path;
use pvc_core::SyncConfig;
use pvc_core::text::{eq_ignore_case, is_blank};
use serde::Serialize;
use tracing::{debug, info};

use crate::document::resolve_ignore_case;
use crate::error::CatalogError;
use crate::release::{ReleaseReader, region_dir};

/// Default checksum file name.
pub const DEFAULT_CHECKSUM_FILE: &str = "sha256.txt";

/// Checks that local release data is current before it is read.
pub trait ReleaseSync: fmt::Debug + Send + Sync {
    /// Inspects (or refreshes) the release data of one region.
    ///
    /// # Errors
    ///
    /// Implementation defined; [`LocalSync`] fails the way
    /// [`ReleaseReader::manifest`] does.
    fn ensure_current(&self, local_root: &Utf8Path, region_key: &str) -> Result<SyncPlan, CatalogError>;
}

/// State of each release listed in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    /// Releases whose stored checksum matches the manifest.
    pub up_to_date: Vec<String>,
    /// Releases whose checksum is absent or differs.
    pub stale: Vec<String>,
    /// Releases whose document is absent.
    pub missing: Vec<String>,
}

impl SyncPlan {
    /// Returns `true` when no release needs fetching.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.stale.is_empty() && self.missing.is_empty()
    }

    /// Total number of releases in the plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.up_to_date.len() + self.stale.len() + self.missing.len()
    }

    /// Releases that need fetching, missing ones first.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().chain(&self.stale).map(String::as_str)
    }
}

/// Offline [`ReleaseSync`] comparing manifest checksums with local files.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use pvc_reader::{LocalSync, ReleaseSync};
///
/// let plan = LocalSync::new().ensure_current(Utf8Path::new("/var/lib/c1/version_data"), "JP")?;
/// for id in plan.pending() {
///     println!("needs download: {id}");
/// }
/// # Ok::<(), pvc_reader::CatalogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalSync {
    reader: ReleaseReader,
    checksum_file: String,
}

impl Default for LocalSync {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSync {
    /// Creates a sync check with the default file names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: ReleaseReader::new(),
            checksum_file: DEFAULT_CHECKSUM_FILE.to_owned(),
        }
    }

    /// Creates a sync check using the file names of `config`.
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            reader: ReleaseReader::new().with_manifest_file(config.manifest_file.clone()),
            checksum_file: config.checksum_file.clone(),
        }
    }

    fn stored_checksum(&self, release_dir: &Utf8Path) -> Option<String> {
        let text = fs::read_to_string(resolve_ignore_case(release_dir, &self.checksum_file)).ok()?;
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

impl ReleaseSync for LocalSync {
    fn ensure_current(&self, local_root: &Utf8Path, region_key: &str) -> Result<SyncPlan, CatalogError> {
        let entries = self.reader.manifest(local_root, region_key)?;
        let region_dir = region_dir(local_root, region_key)?;

        let mut plan = SyncPlan::default();
        for entry in entries {
            let release_dir = resolve_ignore_case(&region_dir, &entry.id);
            if !ReleaseReader::release_path(&region_dir, &entry.id).is_file() {
                debug!(release = %entry.id, "Release document missing");
                plan.missing.push(entry.id);
                continue;
            }

            let stored = self.stored_checksum(&release_dir);
            let current = match (&stored, &entry.sha256) {
                (Some(stored), Some(expected)) => {
                    !is_blank(expected) && eq_ignore_case(stored, expected.trim())
                }
                _ => false,
            };

            if current {
                plan.up_to_date.push(entry.id);
            } else {
                debug!(release = %entry.id, stored = ?stored, expected = ?entry.sha256, "Release checksum differs");
                plan.stale.push(entry.id);
            }
        }

        info!(
            region = region_key.trim(),
            up_to_date = plan.up_to_date.len(),
            stale = plan.stale.len(),
            missing = plan.missing.len(),
            "Checked local release data"
        );
        Ok(plan)
    }
}
