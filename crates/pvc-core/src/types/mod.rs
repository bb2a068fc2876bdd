//! Domain types for the product version catalogue.
//!
//! # Module Organization
//!
//! - [`product`] - Products and their versions
//! - [`source`] - Provenance of a version record
//! - [`locale`] - Legacy locale keys and the document shape they select
//! - [`release`] - Entries of the per-region release manifest
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use pvc_core::{Locale, Product, ProductVersion, VersionSource};
//! ```

pub mod locale;
pub mod product;
pub mod release;
pub mod source;

pub use locale::{LegacySchema, Locale};
pub use product::{Product, ProductVersion};
pub use release::ReleaseEntry;
pub use source::VersionSource;
