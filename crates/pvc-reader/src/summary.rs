//! Catalog counts for display.
//!
//! ```
//! use pvc_core::{Product, ProductVersion, VersionSource};
//! use pvc_reader::CatalogSummary;
//!
//! let mut product = Product::named("WPF");
//! product.versions.push(ProductVersion::new(VersionSource::NewJson).with_version("2026v1"));
//! product.versions.push(ProductVersion::new(VersionSource::OldJson).with_version("20251.1.700"));
//!
//! let summary = CatalogSummary::from_products(&[product]);
//! assert_eq!(summary.versions, 2);
//! assert_eq!(summary.new_source_versions, 1);
//! ```

use std::fmt;

use pvc_core::Product;
use serde::{Deserialize, Serialize};

/// Counts over a product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Number of products.
    pub products: usize,
    /// Number of versions across all products.
    pub versions: usize,
    /// Versions tagged as coming from the release documents.
    pub new_source_versions: usize,
    /// Versions only known from the legacy documents.
    pub legacy_only_versions: usize,
}

impl CatalogSummary {
    /// Counts `products`.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut summary = Self {
            products: products.len(),
            ..Self::default()
        };
        for version in products.iter().flat_map(|p| &p.versions) {
            summary.versions += 1;
            if version.is_new_source() {
                summary.new_source_versions += 1;
            } else {
                summary.legacy_only_versions += 1;
            }
        }
        summary
    }

    /// Share of versions backed by release documents, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new_source_percent(&self) -> f64 {
        if self.versions == 0 {
            return 0.0;
        }
        (self.new_source_versions as f64 / self.versions as f64) * 100.0
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} products, {} versions ({} new, {} legacy only)",
            self.products, self.versions, self.new_source_versions, self.legacy_only_versions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvc_core::{ProductVersion, VersionSource};

    #[test]
    fn test_empty() {
        let summary = CatalogSummary::from_products(&[]);
        assert_eq!(summary, CatalogSummary::default());
        assert!(summary.new_source_percent().abs() < f64::EPSILON);
    }

    #[test]
    fn test_counts_and_display() {
        let mut winforms = Product::named("WinForms");
        winforms.versions = vec![
            ProductVersion::new(VersionSource::NewJson),
            ProductVersion::new(VersionSource::OldJson),
            ProductVersion::new(VersionSource::OldJson),
        ];
        let mut wpf = Product::named("WPF");
        wpf.versions = vec![ProductVersion::new(VersionSource::NewJson)];

        let summary = CatalogSummary::from_products(&[winforms, wpf]);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.versions, 4);
        assert_eq!(summary.new_source_versions, 2);
        assert_eq!(summary.legacy_only_versions, 2);
        assert!((summary.new_source_percent() - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            summary.to_string(),
            "2 products, 4 versions (2 new, 2 legacy only)"
        );
    }
}
