//! Reader for the per-region release documents.
//!
//! # Layout
//!
//! ```text
//! {local_root}/{region}/ReleaseVersion.json        manifest: [{"Id": "2025v2", ...}, ...]
//! {local_root}/{region}/{id}/{id}.json             release:  [{"id": ..., "name": ..., "versions": ...}, ...]
//! ```
//!
//! The manifest must exist and be an array. A release it lists whose file is
//! missing, or whose file is not an array, is skipped and the read goes on.
//! Release files are loaded in parallel and folded in manifest order, so the
//! result does not depend on thread scheduling.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use pvc_core::json::{get_ci, get_non_blank_ci};
use pvc_core::text::{cmp_ignore_case, first_framework, fold_case, slug};
use pvc_core::{FxHashMap, FxHashSet, Product, ProductVersion, ReleaseEntry, VersionSource};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{read_json, resolve_ignore_case};
use crate::error::CatalogError;
use crate::provider::{CatalogQuery, ProductVersionProvider, require};

/// Default manifest file name.
pub const DEFAULT_MANIFEST_FILE: &str = "ReleaseVersion.json";

/// Why a release listed in the manifest contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The release file does not exist.
    Missing,
    /// The release file is not a JSON array.
    NotArray,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "release file not found",
            Self::NotArray => "release file is not a JSON array",
        })
    }
}

/// A release that was skipped during a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRelease {
    /// Release id from the manifest.
    pub id: String,
    /// Expected location of the release file.
    pub path: Utf8PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of [`ReleaseReader::read_with_report`].
#[derive(Debug, Clone, Default)]
pub struct ReleaseRead {
    /// Products sorted by name, each with versions sorted newest first.
    pub products: Vec<Product>,
    /// Releases that contributed nothing, in manifest order.
    pub skipped: Vec<SkippedRelease>,
    /// Number of distinct releases listed in the manifest.
    pub releases: usize,
}

/// Reads the new-schema catalog of one region.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use pvc_reader::ReleaseReader;
///
/// let products = ReleaseReader::new().read(Utf8Path::new("/var/lib/c1/version_data"), "US")?;
/// for product in &products {
///     println!("{} ({} versions)", product.name, product.versions.len());
/// }
/// # Ok::<(), pvc_reader::CatalogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseReader {
    manifest_file: String,
}

impl Default for ReleaseReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseReader {
    /// Creates a reader using [`DEFAULT_MANIFEST_FILE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            manifest_file: DEFAULT_MANIFEST_FILE.to_owned(),
        }
    }

    /// Uses a different manifest file name.
    #[must_use]
    pub fn with_manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }

    /// Path of a release document inside a region directory.
    ///
    /// The release folder and file are matched ignoring case.
    #[must_use]
    pub fn release_path(region_dir: &Utf8Path, id: &str) -> Utf8PathBuf {
        let release_dir = resolve_ignore_case(region_dir, id);
        resolve_ignore_case(&release_dir, &format!("{id}.json"))
    }

    /// Reads the manifest of a region.
    ///
    /// Elements without a non-blank `Id` are ignored; ids repeated (ignoring
    /// case) keep their first occurrence.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidArgument`] when `local_root` or `region_key`
    ///   is blank
    /// - [`CatalogError::FileNotFound`] when the manifest is absent
    /// - [`CatalogError::MalformedJson`] when it is not JSON
    /// - [`CatalogError::Schema`] when it is not an array
    pub fn manifest(
        &self,
        local_root: &Utf8Path,
        region_key: &str,
    ) -> Result<Vec<ReleaseEntry>, CatalogError> {
        let region_dir = region_dir(local_root, region_key)?;
        self.entries(&region_dir)
    }

    /// Reads all releases of a region into one product list.
    ///
    /// # Errors
    ///
    /// Everything [`manifest`](Self::manifest) reports, plus
    /// [`CatalogError::MalformedJson`] for a release file that exists but is
    /// not JSON.
    pub fn read(&self, local_root: &Utf8Path, region_key: &str) -> Result<Vec<Product>, CatalogError> {
        self.read_with_report(local_root, region_key)
            .map(|read| read.products)
    }

    /// Like [`read`](Self::read), also reporting skipped releases.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn read_with_report(
        &self,
        local_root: &Utf8Path,
        region_key: &str,
    ) -> Result<ReleaseRead, CatalogError> {
        let region_dir = region_dir(local_root, region_key)?;
        let entries = self.entries(&region_dir)?;

        let loaded: Vec<Result<Loaded, CatalogError>> = entries
            .par_iter()
            .map(|entry| load_release(&region_dir, &entry.id))
            .collect();

        let mut builder = CatalogBuilder::default();
        let mut skipped = Vec::new();
        for (entry, result) in entries.iter().zip(loaded) {
            match result? {
                Loaded::Items(items) => {
                    debug!(release = %entry.id, entries = items.len(), "Folding release");
                    for item in &items {
                        builder.add(item);
                    }
                }
                Loaded::Skipped(skip) => {
                    warn!(release = %skip.id, path = %skip.path, reason = %skip.reason, "Skipping release");
                    skipped.push(skip);
                }
            }
        }

        let products = builder.finish();
        info!(
            region = region_key.trim(),
            releases = entries.len(),
            skipped = skipped.len(),
            products = products.len(),
            "Read release catalog"
        );

        Ok(ReleaseRead {
            products,
            skipped,
            releases: entries.len(),
        })
    }

    fn entries(&self, region_dir: &Utf8Path) -> Result<Vec<ReleaseEntry>, CatalogError> {
        let path = resolve_ignore_case(region_dir, &self.manifest_file);
        let Value::Array(items) = read_json(&path)? else {
            return Err(CatalogError::schema(path, "release manifest must be a JSON array"));
        };

        let mut seen = FxHashSet::default();
        let entries: Vec<ReleaseEntry> = items
            .iter()
            .filter_map(ReleaseEntry::from_json)
            .filter(|entry| seen.insert(fold_case(&entry.id)))
            .collect();

        debug!(manifest = %path, listed = items.len(), releases = entries.len(), "Read release manifest");
        Ok(entries)
    }
}

impl ProductVersionProvider for ReleaseReader {
    fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        self.read(query.require_root()?, query.require_region()?)
    }
}

/// `{local_root}/{region_key}`, after checking both are present.
///
/// The region directory is matched ignoring case, so `us` finds `US`.
pub(crate) fn region_dir(local_root: &Utf8Path, region_key: &str) -> Result<Utf8PathBuf, CatalogError> {
    require("local_root", local_root.as_str())?;
    let region = require("region_key", region_key)?;
    Ok(resolve_ignore_case(local_root, region))
}

enum Loaded {
    Items(Vec<Value>),
    Skipped(SkippedRelease),
}

fn load_release(region_dir: &Utf8Path, id: &str) -> Result<Loaded, CatalogError> {
    let path = ReleaseReader::release_path(region_dir, id);
    let skip = |path: Utf8PathBuf, reason: SkipReason| {
        Loaded::Skipped(SkippedRelease {
            id: id.to_owned(),
            path,
            reason,
        })
    };
    match read_json(&path) {
        Ok(Value::Array(items)) => Ok(Loaded::Items(items)),
        Ok(_) => Ok(skip(path, SkipReason::NotArray)),
        Err(CatalogError::FileNotFound(path)) => Ok(skip(path, SkipReason::Missing)),
        Err(e) => Err(e),
    }
}

/// Accumulates products across releases, keyed by id slug.
#[derive(Default)]
struct CatalogBuilder {
    index: FxHashMap<String, usize>,
    products: Vec<Product>,
}

impl CatalogBuilder {
    fn add(&mut self, item: &Value) {
        let id = get_non_blank_ci(item, "id");
        let name = get_non_blank_ci(item, "name");
        let Some(key_source) = id.or(name) else {
            debug!("Skipping release entry without id or name");
            return;
        };

        let key = slug(key_source);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let display = name.or(id).unwrap_or(Product::UNNAMED);
                self.products.push(Product::new(key.clone(), display));
                self.index.insert(key, self.products.len() - 1);
                self.products.len() - 1
            }
        };
        let product = &mut self.products[idx];

        match get_ci(item, "versions") {
            Some(block @ Value::Object(_)) => product.versions.extend(item_version(block)),
            Some(Value::Array(items)) => product.versions.extend(items.iter().filter_map(item_version)),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Product> {
        for product in &mut self.products {
            product.versions.sort_by(|a, b| {
                cmp_ignore_case(
                    b.version.as_deref().unwrap_or_default(),
                    a.version.as_deref().unwrap_or_default(),
                )
            });
        }
        self.products.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        self.products
    }
}

/// Maps one object of a `versions` block.
///
/// `version` and `displayVersion` stand in for each other when one is
/// missing. An object with neither, and no frameworks, is dropped.
fn item_version(value: &Value) -> Option<ProductVersion> {
    if !value.is_object() {
        return None;
    }
    let version = get_non_blank_ci(value, "version");
    let display = get_non_blank_ci(value, "displayVersion");
    let frameworks = frameworks_csv(value);

    if version.is_none() && display.is_none() && frameworks.is_none() {
        return None;
    }

    Some(ProductVersion {
        version: version.or(display).map(str::to_owned),
        display_version: display.or(version).map(str::to_owned),
        default_check_frameworks: frameworks.as_deref().and_then(first_framework),
        framework_versions: frameworks,
        ..ProductVersion::new(VersionSource::NewJson)
    })
}

/// `frameworkVersions` as a comma-joined list; accepts a string or an array
/// of strings.
fn frameworks_csv(value: &Value) -> Option<String> {
    match get_ci(value, "frameworkVersions")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let list: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            (!list.is_empty()).then(|| list.join(","))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ReleaseFixture;
    use serde_json::json;

    #[test]
    fn test_read_single_release() {
        let fx = ReleaseFixture::new("US");
        fx.manifest(&json!([{"Id": "2026v1", "Sha256": "abc"}]))
            .release(
                "2026v1",
                &json!([{
                    "id": "WinFormControls",
                    "name": "WinForms Controls",
                    "versions": {"version": "2026v1(111)", "frameworkVersions": ["v11.0"]}
                }]),
            );

        let products = ReleaseReader::new().read(&fx.root, "US").unwrap();
        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert_eq!(product.id, "winformcontrols");
        assert_eq!(product.name, "WinForms Controls");
        assert!(product.description.is_none());

        let version = &product.versions[0];
        assert_eq!(version.version.as_deref(), Some("2026v1(111)"));
        assert_eq!(version.display_version.as_deref(), Some("2026v1(111)"));
        assert_eq!(version.framework_versions.as_deref(), Some("v11.0"));
        assert_eq!(version.default_check_frameworks.as_deref(), Some("v11.0"));
        assert_eq!(version.source, VersionSource::NewJson);
    }

    #[test]
    fn test_paths_match_ignoring_case() {
        let fx = ReleaseFixture::new("US");
        fx.write_file("US/releaseversion.JSON", r#"[{"Id": "2026v1"}]"#)
            .write_file(
                "US/2026V1/2026V1.json",
                r#"[{"id": "WPF", "name": "WPF", "versions": {"version": "2026v1(7)"}}]"#,
            );

        let read = ReleaseReader::new().read_with_report(&fx.root, "us").unwrap();
        assert!(read.skipped.is_empty());
        assert_eq!(read.products.len(), 1);
        assert_eq!(read.products[0].name, "WPF");
        assert!(ReleaseReader::release_path(&fx.region_dir(), "2026v1").is_file());
    }

    #[test]
    fn test_missing_manifest() {
        let fx = ReleaseFixture::new("US");
        let err = ReleaseReader::new().read(&fx.root, "US").unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(ref p) if p.ends_with("US/ReleaseVersion.json")));
    }

    #[test]
    fn test_manifest_not_array() {
        let fx = ReleaseFixture::new("JP");
        fx.manifest(&json!({"Id": "2025v1"}));
        let err = ReleaseReader::new().read(&fx.root, "JP").unwrap_err();
        assert!(matches!(err, CatalogError::Schema { .. }));
    }

    #[test]
    fn test_blank_arguments() {
        let reader = ReleaseReader::new();
        assert!(matches!(
            reader.read(Utf8Path::new(" "), "US"),
            Err(CatalogError::InvalidArgument { name: "local_root", .. })
        ));
        assert!(matches!(
            reader.read(Utf8Path::new("/data"), "\t"),
            Err(CatalogError::InvalidArgument { name: "region_key", .. })
        ));
    }

    #[test]
    fn test_missing_and_non_array_releases_are_skipped() {
        let fx = ReleaseFixture::new("US");
        fx.manifest(&json!([{"Id": "2025v1"}, {"Id": "2025v2"}, {"Id": "2026v1"}]))
            .release("2025v2", &json!({"not": "an array"}))
            .release("2026v1", &json!([{"id": "wpf", "name": "WPF",
                                         "versions": [{"version": "2026v1(100)"}]}]));

        let read = ReleaseReader::new().read_with_report(&fx.root, "US").unwrap();
        assert_eq!(read.releases, 3);
        assert_eq!(read.products.len(), 1);
        assert_eq!(read.products[0].name, "WPF");

        let skipped: Vec<_> = read.skipped.iter().map(|s| (s.id.as_str(), s.reason)).collect();
        assert_eq!(
            skipped,
            [("2025v1", SkipReason::Missing), ("2025v2", SkipReason::NotArray)]
        );
        assert!(read.skipped[0].path.ends_with("2025v1/2025v1.json"));
    }

    #[test]
    fn test_malformed_release_is_fatal() {
        let fx = ReleaseFixture::new("US");
        fx.manifest(&json!([{"Id": "2025v1"}])).release_text("2025v1", "[{");
        let err = ReleaseReader::new().read(&fx.root, "US").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedJson { .. }));
    }

    #[test]
    fn test_products_merge_across_releases() {
        let fx = ReleaseFixture::new("US");
        fx.manifest(&json!([{"id": "2025v2"}, {"ID": "2026v1"}, {"Id": "2026V1"}, {"Id": ""}]))
            .release(
                "2025v2",
                &json!([
                    {"id": "WinFormControls", "versions": {"version": "2025v2(500)"}},
                    {"name": "Blazor Edition", "versions": [{"displayVersion": "2025v2(10)"}]}
                ]),
            )
            .release(
                "2026v1",
                &json!([
                    {"id": "winformcontrols", "name": "WinForms Controls",
                     "versions": {"version": "2026v1(111)"}},
                    {"id": "", "name": "", "versions": {"version": "x"}}
                ]),
            );

        let read = ReleaseReader::new().read_with_report(&fx.root, "US").unwrap();
        assert_eq!(read.releases, 2);

        let products = read.products;
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        // The first release only had an id, which also became the name.
        assert_eq!(names, ["Blazor Edition", "WinFormControls"]);

        let blazor = &products[0];
        assert_eq!(blazor.id, "blazor-edition");
        assert_eq!(blazor.versions[0].version.as_deref(), Some("2025v2(10)"));
        assert_eq!(blazor.versions[0].display_version.as_deref(), Some("2025v2(10)"));

        let winforms = &products[1];
        let versions: Vec<_> = winforms.versions.iter().map(|v| v.version.as_deref()).collect();
        assert_eq!(versions, [Some("2026v1(111)"), Some("2025v2(500)")]);
    }

    #[test]
    fn test_item_version_rules() {
        assert!(item_version(&json!({})).is_none());
        assert!(item_version(&json!({"version": " ", "frameworkVersions": []})).is_none());
        assert!(item_version(&json!("2026v1")).is_none());

        let display_only = item_version(&json!({"displayVersion": "2025v1(710)"})).unwrap();
        assert_eq!(display_only.version, display_only.display_version);
        assert_eq!(display_only.version.as_deref(), Some("2025v1(710)"));

        let frameworks_only = item_version(&json!({"frameworkVersions": "v8.0, v4.8"})).unwrap();
        assert!(frameworks_only.version.is_none());
        assert_eq!(frameworks_only.default_check_frameworks.as_deref(), Some("v8.0"));
    }

    #[test]
    fn test_frameworks_csv() {
        assert_eq!(
            frameworks_csv(&json!({"FrameworkVersions": ["v8.0", "", 4, "v4.8"]})).as_deref(),
            Some("v8.0,v4.8")
        );
        assert_eq!(frameworks_csv(&json!({"frameworkVersions": "v4.8"})).as_deref(), Some("v4.8"));
        assert_eq!(frameworks_csv(&json!({"frameworkVersions": []})), None);
        assert_eq!(frameworks_csv(&json!({"frameworkVersions": 8})), None);
    }

    #[test]
    fn test_provider() {
        let fx = ReleaseFixture::new("KR");
        fx.manifest(&json!([]));
        let reader = ReleaseReader::new();
        assert!(reader.products(&CatalogQuery::new(fx.root.clone(), "KR")).unwrap().is_empty());
        assert!(matches!(
            reader.products(&CatalogQuery::new("", "KR")),
            Err(CatalogError::InvalidArgument { .. })
        ));
    }
}
