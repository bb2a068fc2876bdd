//! Reader for the legacy control-panel documents.
//!
//! One document exists per locale. `US` and `KR` share the English layout
//! ([`LegacySchema::EnKr`]); `JP` uses a container-keyed layout
//! ([`LegacySchema::Jp`]). The layout is picked from the locale, never sniffed
//! from the document.
//!
//! Every version produced here is tagged [`VersionSource::OldJson`]. Version
//! objects carrying neither a version nor a display version are dropped.

mod en_kr;
mod jp;
mod store;

pub use store::LegacyStore;

use camino::Utf8Path;
use pvc_core::json::{get_str_ci, first_str_ci};
use pvc_core::text::{is_blank, to_display_version};
use pvc_core::{LegacySchema, Locale, Product, ProductVersion, VersionSource};
use serde_json::Value;
use tracing::{debug, info};

use crate::document::parse_json;
use crate::error::CatalogError;
use crate::provider::{CatalogQuery, ProductVersionProvider};

/// Reads legacy catalogs from a [`LegacyStore`].
///
/// # Examples
///
/// ```
/// use pvc_reader::{LegacyReader, LegacyStore};
///
/// let store = LegacyStore::in_memory().with_document(
///     "c1ControlPanelEN.json",
///     r#"{"Editions":[{"Name":"WinForms","LatestVersion":"20251.1.710"}]}"#,
/// );
/// let products = LegacyReader::new(store).read("US")?;
///
/// assert_eq!(products.len(), 1);
/// assert_eq!(products[0].versions[0].display_version.as_deref(), Some("2025v1(710)"));
/// # Ok::<(), pvc_reader::CatalogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LegacyReader {
    store: LegacyStore,
}

impl LegacyReader {
    /// Creates a reader over `store`.
    #[must_use]
    pub fn new(store: LegacyStore) -> Self {
        Self { store }
    }

    /// Reads the legacy catalog for a locale key (`US`, `JP` or `KR`).
    ///
    /// Products are returned in document order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidArgument`] for a blank key
    /// - [`CatalogError::UnsupportedLocale`] for any other unknown key
    /// - [`CatalogError::ResourceNotFound`] when the store has no document
    ///   for the locale
    /// - [`CatalogError::MalformedJson`] when the document is not JSON
    pub fn read(&self, locale_key: &str) -> Result<Vec<Product>, CatalogError> {
        if is_blank(locale_key) {
            return Err(CatalogError::invalid_argument(
                "locale_key",
                "a locale key (US, JP, KR) is required",
            ));
        }
        let locale = Locale::from_key(locale_key)
            .ok_or_else(|| CatalogError::unsupported_locale(locale_key.trim()))?;

        let (origin, text) = self.store.load(locale.legacy_file_name())?;
        let products = Self::parse(locale, &origin, &text)?;

        info!(
            locale = %locale,
            origin = %origin,
            products = products.len(),
            versions = products.iter().map(|p| p.versions.len()).sum::<usize>(),
            "Read legacy catalog"
        );

        Ok(products)
    }

    /// Parses a legacy document for `locale`.
    ///
    /// `origin` only labels parse errors.
    ///
    /// # Errors
    ///
    /// [`CatalogError::MalformedJson`] when `text` is not JSON.
    pub fn parse(locale: Locale, origin: &Utf8Path, text: &str) -> Result<Vec<Product>, CatalogError> {
        let root = parse_json(origin, text)?;
        Ok(Self::parse_value(locale.schema(), &root))
    }

    /// Extracts products from an already-parsed legacy document.
    #[must_use]
    pub fn parse_value(schema: LegacySchema, root: &Value) -> Vec<Product> {
        let products = match schema {
            LegacySchema::EnKr => en_kr::parse(root),
            LegacySchema::Jp => jp::parse(root),
        };
        for product in &products {
            debug!(
                id = %product.id,
                name = %product.name,
                versions = product.versions.len(),
                "Legacy product"
            );
        }
        products
    }
}

impl ProductVersionProvider for LegacyReader {
    fn products(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let region = query.require_region()?;
        self.read(region)
    }
}

/// Reads every usable version object of a `Versions` array.
fn read_versions(items: &[Value]) -> Vec<ProductVersion> {
    items.iter().filter_map(read_version).collect()
}

/// Maps one legacy version object. Property names are matched ignoring case.
fn read_version(item: &Value) -> Option<ProductVersion> {
    if !item.is_object() {
        return None;
    }
    let field = |name| get_str_ci(item, name).map(str::to_owned);
    let version = ProductVersion {
        version: field("Version"),
        display_version: field("DisplayVersion"),
        tool_box_version: field("ToolBoxVersion"),
        c1_live_version: field("C1LiveVersion"),
        framework_versions: field("FrameWorkVersions"),
        default_check_frameworks: field("DefaultCheckFrameWorks"),
        source: VersionSource::OldJson,
    };
    version.has_identity().then_some(version)
}

/// Synthesizes a version from a `LatestVersion` property.
///
/// With `siblings`, the display, toolbox, C1Live and framework properties
/// next to `LatestVersion` are copied too; the display version is derived
/// from the raw version when absent.
fn latest_version(node: &Value, siblings: bool) -> Option<ProductVersion> {
    let latest = get_str_ci(node, "LatestVersion").filter(|s| !is_blank(s))?;
    let field = |name| {
        if siblings {
            get_str_ci(node, name).map(str::to_owned)
        } else {
            None
        }
    };

    Some(ProductVersion {
        version: Some(latest.to_owned()),
        display_version: Some(field("DisplayVersion").unwrap_or_else(|| to_display_version(latest))),
        tool_box_version: field("ToolBoxVersion"),
        c1_live_version: field("C1LiveVersion"),
        framework_versions: field("FrameWorkVersions"),
        default_check_frameworks: field("DefaultCheckFrameWorks"),
        source: VersionSource::OldJson,
    })
}

/// Display name from the first non-blank of `names`, else [`Product::UNNAMED`].
fn display_name(node: &Value, names: &[&str]) -> String {
    first_str_ci(node, names).unwrap_or(Product::UNNAMED).to_owned()
}
