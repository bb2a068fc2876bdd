//! Common interface over the catalog sources.

use camino::{Utf8Path, Utf8PathBuf};
use pvc_core::Product;
use pvc_core::text::is_blank;

use crate::error::CatalogError;

/// Parameters of a catalog read.
///
/// Which fields are required depends on the provider: the legacy reader only
/// needs `region_key`, release-backed providers need both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Root directory holding one sub-directory per region.
    pub local_root: Utf8PathBuf,
    /// Region (or locale) key such as `US` or `JP`.
    pub region_key: String,
}

impl CatalogQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(local_root: impl Into<Utf8PathBuf>, region_key: impl Into<String>) -> Self {
        Self {
            local_root: local_root.into(),
            region_key: region_key.into(),
        }
    }

    /// The region key, trimmed.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidArgument`] when it is blank.
    pub fn require_region(&self) -> Result<&str, CatalogError> {
        require("region_key", &self.region_key)
    }

    /// The local root.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidArgument`] when it is blank.
    pub fn require_root(&self) -> Result<&Utf8Path, CatalogError> {
        require("local_root", self.local_root.as_str())?;
        Ok(&self.local_root)
    }
}

/// Returns `value` trimmed, or [`CatalogError::InvalidArgument`] naming
/// `name` when it is blank.
pub(crate) fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, CatalogError> {
    if is_blank(value) {
        return Err(CatalogError::invalid_argument(name, "must not be blank"));
    }
    Ok(value.trim())
}

/// A source of products.
///
/// Implemented by [`LegacyReader`](crate::LegacyReader),
/// [`ReleaseReader`](crate::ReleaseReader) and the merging
/// [`CatalogService`](crate::CatalogService), so callers can swap sources
/// without caring which schema backs them.
pub trait ProductVersionProvider {
    /// Reads the products selected by `query`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidArgument`] when a field the provider needs is
    /// blank; otherwise whatever the underlying read reports.
    fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError>;
}
