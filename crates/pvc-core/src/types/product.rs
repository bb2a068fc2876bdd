//! Products and product versions.
//!
//! A [`Product`] owns its [`ProductVersion`]s; versions are never shared
//! between products.
//!
//! ```
//! use pvc_core::{Product, ProductVersion, VersionSource};
//!
//! let mut product = Product::named("WinForms");
//! assert_eq!(product.id, "winforms");
//!
//! product.versions.push(
//!     ProductVersion::new(VersionSource::OldJson)
//!         .with_version("20251.1.710")
//!         .with_display_version("2025v1(710)"),
//! );
//! assert!(!product.has_new_source());
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::text::{self, canonical_version, is_blank_opt};
use crate::types::source::VersionSource;

/// One released version of a product.
///
/// Optional fields are `None` when the source document did not carry them.
/// Records are built once by a reader; the merger constructs new records
/// instead of editing existing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVersion {
    /// Raw version token (e.g. `20251.1.710`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Human label (e.g. `2025v1(710)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_version: Option<String>,

    /// Visual Studio toolbox version (e.g. `20251.710`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_box_version: Option<String>,

    /// C1Live version (e.g. `20231.672`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c1_live_version: Option<String>,

    /// Comma-joined list of supported frameworks (e.g. `v8.0,v4.8,v4.6.2`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_versions: Option<String>,

    /// Framework checked by default; the first entry of `framework_versions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_check_frameworks: Option<String>,

    /// Which schema produced this record.
    pub source: VersionSource,
}

impl ProductVersion {
    /// Creates an empty version record tagged with `source`.
    #[must_use]
    pub fn new(source: VersionSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Sets the raw version token.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_display_version(mut self, display_version: impl Into<String>) -> Self {
        self.display_version = Some(display_version.into());
        self
    }

    /// Sets the framework list and derives the default framework from it.
    #[must_use]
    pub fn with_frameworks(mut self, csv: impl Into<String>) -> Self {
        let csv = csv.into();
        self.default_check_frameworks = text::first_framework(&csv);
        self.framework_versions = Some(csv);
        self
    }

    /// Key used to detect the same version across sources: the trimmed raw
    /// version token. Empty when the record has no version token.
    #[must_use]
    pub fn version_key(&self) -> String {
        canonical_version(self.version.as_deref())
    }

    /// Returns `true` if either the version token or the display label is set.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !is_blank_opt(self.version.as_deref()) || !is_blank_opt(self.display_version.as_deref())
    }

    /// Returns `true` if this record came from the new schema.
    #[inline]
    #[must_use]
    pub const fn is_new_source(&self) -> bool {
        self.source.is_new()
    }

    /// Individual framework entries of `framework_versions`.
    #[must_use]
    pub fn frameworks(&self) -> SmallVec<[&str; 4]> {
        self.framework_versions
            .as_deref()
            .map(text::split_frameworks)
            .unwrap_or_default()
    }
}

/// A product (e.g. WinForms, WPF, Blazor) and its available versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier slug derived from the product id or name.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Versions, newest first.
    #[serde(default)]
    pub versions: Vec<ProductVersion>,
}

impl Product {
    /// Display name used when a source carries no usable name.
    pub const UNNAMED: &'static str = "Unnamed Product";

    /// Creates a product with an explicit id.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            versions: Vec::new(),
        }
    }

    /// Creates a product whose id is the slug of its name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(text::slug(&name), name)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Returns `true` if any version came from the new schema.
    #[must_use]
    pub fn has_new_source(&self) -> bool {
        self.versions.iter().any(ProductVersion::is_new_source)
    }
}
