//! Reconciliation of legacy and release catalogs.
//!
//! Products are matched by canonical name (whitespace collapsed, case
//! ignored), versions within a product by their trimmed version token (case
//! ignored). When a version appears more than once, values from the release
//! catalog win over legacy values; a legacy value is never replaced by
//! another legacy value.
//!
//! The merge is a pure function of its two inputs.

use pvc_core::text::{canonical_name, cmp_ignore_case, fold_case, is_blank, is_blank_opt, slug};
use pvc_core::{FxHashMap, Product, ProductVersion, fx_hash_map};
use tracing::{debug, info};

/// Merges a legacy catalog with a release catalog.
///
/// The result holds one product per canonical name, sorted by name ignoring
/// case. Within each product, release-sourced versions come first, then
/// versions in descending order of their version token.
///
/// # Examples
///
/// ```
/// use pvc_core::{Product, ProductVersion, VersionSource};
/// use pvc_reader::merge_catalogs;
///
/// let mut legacy = Product::named("WinForms");
/// legacy.versions.push(
///     ProductVersion::new(VersionSource::OldJson)
///         .with_version("1.0")
///         .with_display_version("old label"),
/// );
///
/// let mut release = Product::named("winforms");
/// release.versions.push(
///     ProductVersion::new(VersionSource::NewJson)
///         .with_version("1.0")
///         .with_display_version("new label"),
/// );
///
/// let merged = merge_catalogs(&[legacy], &[release]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].name, "WinForms");
/// assert_eq!(merged[0].versions.len(), 1);
/// assert_eq!(merged[0].versions[0].source, VersionSource::NewJson);
/// assert_eq!(merged[0].versions[0].display_version.as_deref(), Some("new label"));
/// ```
#[must_use]
pub fn merge_catalogs(legacy: &[Product], release: &[Product]) -> Vec<Product> {
    let mut index: FxHashMap<String, usize> = fx_hash_map();
    let mut groups: Vec<(String, Vec<&Product>)> = Vec::new();

    for product in legacy.iter().chain(release) {
        let canonical = canonical_name(&product.name);
        let key = fold_case(&canonical);
        match index.get(&key) {
            Some(&idx) => groups[idx].1.push(product),
            None => {
                index.insert(key, groups.len());
                groups.push((canonical, vec![product]));
            }
        }
    }

    let mut merged: Vec<Product> = groups
        .iter()
        .map(|(canonical, members)| merge_group(canonical, members))
        .collect();
    merged.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));

    info!(
        legacy = legacy.len(),
        release = release.len(),
        merged = merged.len(),
        "Merged catalogs"
    );
    merged
}

/// Merges the products sharing one canonical name.
fn merge_group(canonical: &str, members: &[&Product]) -> Product {
    // Release-backed record first, then name; ties keep input order.
    let primary = members.iter().min_by(|a, b| {
        b.has_new_source()
            .cmp(&a.has_new_source())
            .then_with(|| cmp_ignore_case(&a.name, &b.name))
    });

    let name = members
        .iter()
        .map(|p| p.name.as_str())
        .find(|name| !is_blank(name))
        .unwrap_or(canonical)
        .to_owned();

    let id = members
        .iter()
        .find(|p| p.has_new_source())
        .map(|p| p.id.as_str())
        .filter(|id| !is_blank(id))
        .or_else(|| members.iter().map(|p| p.id.as_str()).find(|id| !is_blank(id)))
        .map_or_else(|| slug(&name), str::to_owned);

    let mut index: FxHashMap<String, usize> = fx_hash_map();
    let mut versions: Vec<ProductVersion> = Vec::new();
    for version in members.iter().flat_map(|p| &p.versions) {
        let key = version.version_key();
        if key.is_empty() {
            continue;
        }
        match index.get(&fold_case(&key)) {
            Some(&idx) => versions[idx] = merge_version(&versions[idx], version),
            None => {
                index.insert(fold_case(&key), versions.len());
                versions.push(version.clone());
            }
        }
    }

    versions.sort_by(|a, b| {
        b.is_new_source().cmp(&a.is_new_source()).then_with(|| {
            cmp_ignore_case(
                b.version.as_deref().unwrap_or_default(),
                a.version.as_deref().unwrap_or_default(),
            )
        })
    });

    if members.len() > 1 {
        debug!(name = %name, id = %id, members = members.len(), versions = versions.len(), "Merged product");
    }

    Product {
        id,
        name,
        description: primary.and_then(|p| p.description.clone()),
        versions,
    }
}

/// Combines an accumulated version with another record of the same version.
///
/// The accumulated version token stays unless it is blank. Every other field
/// takes the candidate's value only when the candidate is release-sourced and
/// the value is non-blank.
fn merge_version(existing: &ProductVersion, candidate: &ProductVersion) -> ProductVersion {
    let prefer_new = |pick: fn(&ProductVersion) -> &Option<String>| {
        let value = pick(candidate);
        if candidate.is_new_source() && !is_blank_opt(value.as_deref()) {
            value.clone()
        } else {
            pick(existing).clone()
        }
    };

    ProductVersion {
        version: if is_blank_opt(existing.version.as_deref()) {
            candidate.version.clone()
        } else {
            existing.version.clone()
        },
        display_version: prefer_new(|v| &v.display_version),
        tool_box_version: prefer_new(|v| &v.tool_box_version),
        c1_live_version: prefer_new(|v| &v.c1_live_version),
        framework_versions: prefer_new(|v| &v.framework_versions),
        default_check_frameworks: prefer_new(|v| &v.default_check_frameworks),
        source: existing.source.combine(candidate.source),
    }
}
