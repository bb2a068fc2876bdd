//! On-disk fixtures for reader tests.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tempfile::TempDir;

/// A temporary `{root}/{region}/...` release layout.
pub(crate) struct ReleaseFixture {
    _dir: TempDir,
    pub root: Utf8PathBuf,
    pub region: &'static str,
}

impl ReleaseFixture {
    pub fn new(region: &'static str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join(region)).unwrap();
        Self {
            _dir: dir,
            root,
            region,
        }
    }

    pub fn region_dir(&self) -> Utf8PathBuf {
        self.root.join(self.region)
    }

    pub fn manifest(&self, value: &Value) -> &Self {
        self.write(&self.region_dir().join("ReleaseVersion.json"), &value.to_string());
        self
    }

    pub fn release(&self, id: &str, value: &Value) -> &Self {
        self.release_text(id, &value.to_string())
    }

    pub fn release_text(&self, id: &str, text: &str) -> &Self {
        self.write(&self.region_dir().join(id).join(format!("{id}.json")), text);
        self
    }

    pub fn checksum(&self, id: &str, sha: &str) -> &Self {
        self.write(&self.region_dir().join(id).join("sha256.txt"), sha);
        self
    }

    /// Writes `text` to `relative` under the root.
    pub fn write_file(&self, relative: &str, text: &str) -> &Self {
        self.write(&self.root.join(relative), text);
        self
    }

    fn write(&self, path: &Utf8Path, text: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }
}
