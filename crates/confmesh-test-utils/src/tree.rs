//! [`ConfTree`] builder for configuration source trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary configuration source root with helpers for writing sources.
///
/// # Example
///
/// ```rust,no_run
/// use confmesh_test_utils::ConfTree;
///
/// let tree = ConfTree::new()
///     .with_file("base/catalog.yml", "cars:\n  type: csv\n")
///     .with_file("prod/catalog.yml", "cars:\n  type: parquet\n");
/// tree.assert_file_exists("prod/catalog.yml");
/// ```
pub struct ConfTree {
    temp_dir: TempDir,
}

impl Default for ConfTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfTree {
    /// Create an empty temporary source root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the source root path.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let full_path = self.path(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", full_path.display()));
        self
    }

    /// Builder form of [`ConfTree::write`].
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    /// Create an empty directory (e.g. an environment with no overlay files).
    pub fn mkdir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    /// Assert that `relative` exists inside the tree.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
