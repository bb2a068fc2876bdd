//! Core types, errors, and utilities for the product version catalogue.
//!
//! This crate provides the foundational pieces shared by the readers and the CLI:
//!
//! - Error types for configuration handling
//! - Configuration structures
//! - Domain types (`Product`, `ProductVersion`, `VersionSource`, `Locale`)
//! - Text normalization (slugs, canonical names, display versions)
//! - Case-insensitive lookup and tree walking over `serde_json` values
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod json;
pub mod text;
pub mod types;

pub use config::{CatalogConfig, Config, LegacyConfig, SyncConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_map_with_capacity};
pub use types::{
    LegacySchema, Locale, Product, ProductVersion, ReleaseEntry, VersionSource,
};
