//! Error types for the pvc-reader crate.
//!
//! This module provides the [`CatalogError`] type for errors that can occur
//! while locating, reading, and interpreting catalog documents.

use camino::{Utf8Path, Utf8PathBuf};
use pvc_core::ConfigError;

/// Errors that can occur while reading a catalog.
///
/// # Error Recovery Strategy
///
/// - **Caller errors** ([`CatalogError::InvalidArgument`],
///   [`CatalogError::UnsupportedLocale`], [`CatalogError::Config`]): fix the
///   request, retrying with the same input fails the same way
/// - **Data errors** ([`CatalogError::ResourceNotFound`],
///   [`CatalogError::FileNotFound`], [`CatalogError::MalformedJson`],
///   [`CatalogError::Schema`]): the request was fine but the local data is
///   absent or unusable; a fresh sync may fix it
/// - **I/O errors** ([`CatalogError::Io`]): environment problems
///
/// Per-release problems (a release file that is missing or not an array) are
/// not errors at all; the release reader skips them and reports them in
/// [`ReleaseRead::skipped`](crate::ReleaseRead::skipped).
///
/// # Examples
///
/// ```
/// use pvc_reader::CatalogError;
///
/// fn describe(err: &CatalogError) -> &'static str {
///     match err {
///         CatalogError::InvalidArgument { .. } => "bad argument",
///         CatalogError::UnsupportedLocale(_) => "unknown locale",
///         CatalogError::ResourceNotFound(_) | CatalogError::FileNotFound(_) => "missing data",
///         CatalogError::MalformedJson { .. } | CatalogError::Schema { .. } => "bad data",
///         CatalogError::Io { .. } => "io",
///         CatalogError::Config(_) => "config",
///     }
/// }
///
/// assert_eq!(describe(&CatalogError::unsupported_locale("CN")), "unknown locale");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A required parameter was missing or blank.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The locale key is not one of the supported legacy locales.
    #[error("unsupported locale '{0}' (supported: US, JP, KR)")]
    UnsupportedLocale(String),

    /// The legacy document for a locale could not be located.
    #[error("legacy resource not found: {0}")]
    ResourceNotFound(String),

    /// A required file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(Utf8PathBuf),

    /// A document could not be parsed as JSON.
    #[error("malformed JSON in {path}: {source}")]
    MalformedJson {
        /// The document that failed to parse.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but its top-level shape is wrong.
    #[error("unexpected shape in {path}: {reason}")]
    Schema {
        /// The offending document.
        path: Utf8PathBuf,
        /// What was expected.
        reason: String,
    },

    /// Reading a file failed for a reason other than it being absent.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CatalogError {
    /// Creates a new [`CatalogError::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a new [`CatalogError::UnsupportedLocale`] error.
    #[inline]
    pub fn unsupported_locale(key: impl Into<String>) -> Self {
        Self::UnsupportedLocale(key.into())
    }

    /// Creates a new [`CatalogError::MalformedJson`] error.
    #[inline]
    pub fn malformed(path: impl Into<Utf8PathBuf>, source: serde_json::Error) -> Self {
        Self::MalformedJson {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`CatalogError::Schema`] error.
    #[inline]
    pub fn schema(path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`CatalogError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if refreshing the local data could fix this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound(_)
                | Self::FileNotFound(_)
                | Self::MalformedJson { .. }
                | Self::Schema { .. }
        )
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::FileNotFound(path)
            | Self::MalformedJson { path, .. }
            | Self::Schema { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::InvalidArgument { .. }
            | Self::UnsupportedLocale(_)
            | Self::ResourceNotFound(_)
            | Self::Config(_) => None,
        }
    }
}
