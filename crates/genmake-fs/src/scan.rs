//! Source tree scanning
//!
//! Collects the files under a set of root directories that match a set of
//! extensions, the way a shell `root/**` glob would: symlinks are followed and
//! hidden entries are skipped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::ProjectPath;
use crate::path::real_location;

/// Collect every file under `roots` whose extension is in `extensions`.
///
/// Extensions are given with their leading dot (`.cpp`). Files located under
/// any of the `excluded` directories are dropped. A file reached more than
/// once (through overlapping roots or symlinks) is kept only the first time,
/// in root order then traversal order, and is expressed in the domain of the
/// root that reached it.
pub fn scan(
    roots: &[ProjectPath],
    extensions: &[&str],
    excluded: &[ProjectPath],
) -> Vec<ProjectPath> {
    let mut files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        tracing::debug!(root = %root, "Scanning directory");

        let walker = WalkDir::new(root.location())
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(root = %root, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let location = real_location(entry.path());
            if is_excluded(&location, excluded) {
                continue;
            }
            if !has_extension(&location, extensions) {
                continue;
            }
            if !seen.insert(location.clone()) {
                continue;
            }
            files.push(root.in_same_domain(location));
        }
    }

    files
}

/// Reduce files to their parent directories, in first-seen order, without
/// duplicates.
pub fn containing_directories(files: &[ProjectPath]) -> Vec<ProjectPath> {
    let mut dirs = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut previous: Option<PathBuf> = None;

    for file in files {
        let dir = file.parent_dir();
        // Consecutive files usually share a directory; skip the set lookup.
        if previous.as_deref() == Some(dir.location()) {
            continue;
        }
        previous = Some(dir.location().to_path_buf());
        if seen.insert(dir.location().to_path_buf()) {
            dirs.push(dir);
        }
    }

    dirs
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_excluded(location: &Path, excluded: &[ProjectPath]) -> bool {
    excluded
        .iter()
        .any(|dir| location.starts_with(dir.location()))
}

fn has_extension(location: &Path, extensions: &[&str]) -> bool {
    location
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.strip_prefix('.').unwrap_or(wanted) == ext)
        })
}
