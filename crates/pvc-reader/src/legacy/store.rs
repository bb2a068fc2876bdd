//! Where legacy control-panel documents are loaded from.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::CatalogError;

/// Source of the legacy control-panel documents.
///
/// A document is located by file-name suffix, ignoring case, so a store may
/// hold names such as `Data.Legacy.c1ControlPanelEN.json`. When several
/// entries match, the first wins: insertion order for a memory store,
/// file-name order for a directory store.
///
/// # Examples
///
/// ```
/// use pvc_reader::LegacyStore;
///
/// let store = LegacyStore::in_memory()
///     .with_document("Data.Legacy.c1ControlPanelEN.json", r#"{"Editions":[]}"#);
///
/// let (origin, text) = store.load("C1CONTROLPANELEN.JSON").unwrap();
/// assert_eq!(origin.as_str(), "Data.Legacy.c1ControlPanelEN.json");
/// assert_eq!(text, r#"{"Editions":[]}"#);
/// ```
#[derive(Debug, Clone)]
pub struct LegacyStore {
    backing: Backing,
}

#[derive(Debug, Clone)]
enum Backing {
    Directory(Utf8PathBuf),
    Memory(Vec<(String, String)>),
}

impl LegacyStore {
    /// A store backed by the files of `dir` (not recursive).
    #[must_use]
    pub fn directory(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            backing: Backing::Directory(dir.into()),
        }
    }

    /// An empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory(Vec::new()),
        }
    }

    /// Adds a document to an in-memory store.
    ///
    /// A directory store is turned into an in-memory store holding only the
    /// added documents.
    #[must_use]
    pub fn with_document(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        let entry = (name.into(), text.into());
        match &mut self.backing {
            Backing::Memory(docs) => docs.push(entry),
            Backing::Directory(_) => self.backing = Backing::Memory(vec![entry]),
        }
        self
    }

    /// Loads the document whose name ends with `suffix`.
    ///
    /// Returns the matched name (the full path for a directory store) and the
    /// document text.
    ///
    /// # Errors
    ///
    /// [`CatalogError::ResourceNotFound`] when no entry matches or the
    /// directory does not exist; [`CatalogError::Io`] when the matched file
    /// cannot be read.
    pub fn load(&self, suffix: &str) -> Result<(Utf8PathBuf, String), CatalogError> {
        match &self.backing {
            Backing::Memory(docs) => docs
                .iter()
                .find(|(name, _)| ends_with_ignore_case(name, suffix))
                .map(|(name, text)| (Utf8PathBuf::from(name), text.clone()))
                .ok_or_else(|| CatalogError::ResourceNotFound(suffix.to_owned())),
            Backing::Directory(dir) => {
                let path = Self::find_in_directory(dir, suffix)?;
                debug!(path = %path, "Loading legacy document");
                let text = fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
                Ok((path, text))
            }
        }
    }

    fn find_in_directory(dir: &Utf8Path, suffix: &str) -> Result<Utf8PathBuf, CatalogError> {
        let not_found = || CatalogError::ResourceNotFound(format!("{suffix} in {dir}"));

        let Ok(entries) = dir.read_dir_utf8() else {
            return Err(not_found());
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_owned())
            .filter(|name| ends_with_ignore_case(name, suffix))
            .collect();
        names.sort_unstable();

        names
            .into_iter()
            .next()
            .map(|name| dir.join(name))
            .ok_or_else(not_found)
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_ends_with_ignore_case() {
        assert!(ends_with_ignore_case("Data.c1ControlPanelEN.json", "c1controlpanelen.json"));
        assert!(ends_with_ignore_case("c1ControlPanelEN.json", "c1ControlPanelEN.json"));
        assert!(!ends_with_ignore_case("EN.json", "c1ControlPanelEN.json"));
        assert!(!ends_with_ignore_case("c1ControlPanelJP.json", "c1ControlPanelEN.json"));
    }

    #[test]
    fn test_memory_first_match_wins() {
        let store = LegacyStore::in_memory()
            .with_document("a.c1ControlPanelKR.json", "first")
            .with_document("b.c1ControlPanelKR.json", "second");
        let (name, text) = store.load("c1ControlPanelKR.json").unwrap();
        assert_eq!(name.as_str(), "a.c1ControlPanelKR.json");
        assert_eq!(text, "first");
    }

    #[test]
    fn test_memory_not_found() {
        let store = LegacyStore::in_memory().with_document("c1ControlPanelEN.json", "{}");
        let err = store.load("c1ControlPanelJP.json").unwrap_err();
        assert!(matches!(err, CatalogError::ResourceNotFound(_)));
    }

    #[test]
    fn test_directory_lookup() {
        let dir = TempDir::new().unwrap();
        let root = utf8_dir(&dir);
        fs::write(root.join("C1CONTROLPANELJP.JSON"), r#"{"Products":[]}"#).unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let store = LegacyStore::directory(&root);
        let (path, text) = store.load("c1ControlPanelJP.json").unwrap();
        assert_eq!(path, root.join("C1CONTROLPANELJP.JSON"));
        assert_eq!(text, r#"{"Products":[]}"#);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_follows_symlinks() {
        let dir = TempDir::new().unwrap();
        let root = utf8_dir(&dir);
        fs::create_dir(root.join("data")).unwrap();
        fs::write(root.join("data/en-2025.json"), r#"{"Editions":[]}"#).unwrap();
        std::os::unix::fs::symlink(root.join("data/en-2025.json"), root.join("c1ControlPanelEN.json")).unwrap();
        std::os::unix::fs::symlink(root.join("data"), root.join("c1ControlPanelJP.json")).unwrap();

        let store = LegacyStore::directory(&root);
        let (path, text) = store.load("c1ControlPanelEN.json").unwrap();
        assert_eq!(path, root.join("c1ControlPanelEN.json"));
        assert_eq!(text, r#"{"Editions":[]}"#);

        // A link to a directory is not a document.
        let err = store.load("c1ControlPanelJP.json").unwrap_err();
        assert!(matches!(err, CatalogError::ResourceNotFound(_)));
    }

    #[test]
    fn test_directory_missing() {
        let dir = TempDir::new().unwrap();
        let store = LegacyStore::directory(utf8_dir(&dir).join("nope"));
        let err = store.load("c1ControlPanelEN.json").unwrap_err();
        assert!(matches!(err, CatalogError::ResourceNotFound(_)));
    }
}
