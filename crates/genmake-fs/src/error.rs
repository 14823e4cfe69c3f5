//! Error types for genmake-fs

use std::path::PathBuf;

/// Result type for genmake-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of filesystem entry a check expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "a file"),
            Self::Directory => write!(f, "a directory"),
        }
    }
}

/// Errors that can occur in genmake-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Base dir {path} is not valid ({reason})")]
    InvalidBaseDirectory { path: PathBuf, reason: String },

    #[error("{path} is an absolute path and has no relative form")]
    NotRelative { path: PathBuf },

    #[error("Could not determine the user home directory")]
    HomeDirectoryUnavailable,

    #[error("{path} cannot be safely removed ({reason}), please remove it manually")]
    UnsafeOverwrite { path: PathBuf, reason: String },

    #[error("{path} doesn't exist")]
    RequiredFileMissing { path: PathBuf },

    #[error("{path} is not {expected}")]
    RequiredFileWrongType { path: PathBuf, expected: EntryKind },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_base(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseDirectory {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
