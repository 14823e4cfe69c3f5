//! [`TestProject`] builder for generator test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helper methods for test setup and
/// assertion.
///
/// The root is canonicalized, so locations computed by the generator can be
/// compared against `root().join(...)` directly even where the temp directory
/// sits behind a symlink.
///
/// # Example
///
/// ```rust,no_run
/// use genmake_test_utils::project::TestProject;
///
/// let project = TestProject::new();
/// project.write_sketch("proj/sketch.ino");
/// project.write_config("proj/board.yaml", "fqbn: arduino:avr:uno\n");
/// project.assert_file_exists("proj/board.yaml");
/// ```
pub struct TestProject {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Return the canonical root path of the temporary directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `rel` under the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write `content` at `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a YAML configuration document at `rel`.
    pub fn write_config(&self, rel: &str, yaml: &str) -> PathBuf {
        self.write_file(rel, yaml)
    }

    /// Write a minimal Arduino sketch at `rel`.
    pub fn write_sketch(&self, rel: &str) -> PathBuf {
        self.write_file(rel, "void setup() {}\nvoid loop() {}\n")
    }

    /// Create the directory `rel` and its parents.
    pub fn create_dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a symlink at `link` pointing to `target`, both relative to root.
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, link: &str) -> PathBuf {
        let link_path = self.path(link);
        if let Some(parent) = link_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        std::os::unix::fs::symlink(self.path(target), &link_path).unwrap();
        link_path
    }

    /// Read the file at `rel`.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, rel: &str) -> String {
        let full_path = self.path(rel);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            self.path(path).display(),
            content,
            file_content
        );
    }
}
