//! Line-oriented I/O and the safe-overwrite gate for generated files

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

use crate::constants::has_generated_marker;
use crate::error::EntryKind;
use crate::{Error, ProjectPath, Result};

/// Permission bits given to generated scripts.
#[cfg(unix)]
pub const SCRIPT_MODE: u32 = 0o755;

impl ProjectPath {
    /// Read the file as lines, without line terminators.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let content = read_text(self)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// Append `lines` to the file, terminating each with a newline.
    ///
    /// Creates the file (and its parent directories) when missing.
    pub fn write_lines(&self, lines: &[String]) -> Result<()> {
        let native_path = self.location();

        if let Some(parent) = native_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(native_path)
            .map_err(|e| Error::io(native_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io(native_path, e))
    }

    /// Check that the file may be replaced by a generated one.
    ///
    /// Passes when nothing exists at the location, or a regular file exists
    /// that is empty or carries the generated-file marker.
    pub fn ensure_overwritable(&self) -> Result<()> {
        let native_path = self.location();
        let Ok(metadata) = fs::symlink_metadata(native_path) else {
            return Ok(());
        };

        if !metadata.is_file() {
            return Err(Error::UnsafeOverwrite {
                path: native_path.to_path_buf(),
                reason: "not a file".into(),
            });
        }
        if metadata.len() == 0 {
            return Ok(());
        }

        let head = read_head(self, 2)?;
        if !has_generated_marker(&head) {
            return Err(Error::UnsafeOverwrite {
                path: native_path.to_path_buf(),
                reason: "not empty, not generated by us".into(),
            });
        }
        Ok(())
    }

    /// Delete a previously generated file, refusing to touch anything else.
    pub fn safe_remove_if_present(&self) -> Result<()> {
        self.ensure_overwritable()?;
        let native_path = self.location();
        match fs::remove_file(native_path) {
            Ok(()) => {
                tracing::debug!(path = %native_path.display(), "Removed previous output");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(native_path, e)),
        }
    }

    /// Give the file the executable bits used for generated scripts.
    #[cfg(unix)]
    pub fn mark_executable(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let native_path = self.location();
        fs::set_permissions(native_path, fs::Permissions::from_mode(SCRIPT_MODE))
            .map_err(|e| Error::io(native_path, e))
    }

    #[cfg(not(unix))]
    pub fn mark_executable(&self) -> Result<()> {
        Ok(())
    }
}

/// Read text content from a file.
pub fn read_text(path: &ProjectPath) -> Result<String> {
    let native_path = path.location();
    fs::read_to_string(native_path).map_err(|e| Error::io(native_path, e))
}

/// Read the raw bytes of the first `lines` lines of a file.
fn read_head(path: &ProjectPath, lines: usize) -> Result<Vec<u8>> {
    let native_path = path.location();
    let file = File::open(native_path).map_err(|e| Error::io(native_path, e))?;
    let mut reader = BufReader::new(file);
    let mut head = Vec::new();
    for _ in 0..lines {
        let read = reader
            .read_until(b'\n', &mut head)
            .map_err(|e| Error::io(native_path, e))?;
        if read == 0 {
            break;
        }
    }
    Ok(head)
}

/// Fail unless every path exists and is a regular file.
pub fn check_files_exist<'a>(paths: impl IntoIterator<Item = &'a ProjectPath>) -> Result<()> {
    check_entries(paths, EntryKind::File)
}

/// Fail unless every path exists and is a directory.
pub fn check_dirs_exist<'a>(paths: impl IntoIterator<Item = &'a ProjectPath>) -> Result<()> {
    check_entries(paths, EntryKind::Directory)
}

fn check_entries<'a>(
    paths: impl IntoIterator<Item = &'a ProjectPath>,
    expected: EntryKind,
) -> Result<()> {
    for path in paths {
        if !path.exists() {
            return Err(Error::RequiredFileMissing {
                path: path.location().to_path_buf(),
            });
        }
        let matches = match expected {
            EntryKind::File => path.exists_as_file(),
            EntryKind::Directory => path.exists_as_directory(),
        };
        if !matches {
            return Err(Error::RequiredFileWrongType {
                path: path.location().to_path_buf(),
                expected,
            });
        }
    }
    Ok(())
}
