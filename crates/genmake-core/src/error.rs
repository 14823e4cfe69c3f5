//! Error types for genmake-core

use std::path::{Path, PathBuf};

/// Result type for genmake-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in genmake-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration layer could not be read
    #[error("Failed opening configuration file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration layer is not valid YAML, or has the wrong shape
    #[error("Failed parsing configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A configuration file includes itself, directly or indirectly
    #[error(
        "Circular configuration inclusion detected while parsing {path}\nInclusion stack:\n{}",
        format_stack(.stack)
    )]
    CircularInclusion { path: PathBuf, stack: Vec<PathBuf> },

    /// No layer set a required field
    #[error("Missing {field} field in configuration")]
    MissingRequiredField { field: &'static str },

    /// An output path does not follow the naming rule of its artifact
    #[error("Please use a {artifact} file name {rule} (got {path})")]
    InvalidOutputName {
        artifact: &'static str,
        rule: &'static str,
        path: PathBuf,
    },

    /// A template could not be read
    #[error("Failed reading template {path}: {source}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: genmake_fs::Error,
    },

    /// The toolchain build used to harvest definitions failed
    #[error("Build rule '{rule}' failed: {diagnostics}")]
    BuildInvocationFailure { rule: String, diagnostics: String },

    /// Filesystem error from genmake-fs
    #[error(transparent)]
    Fs(#[from] genmake_fs::Error),
}

fn format_stack(stack: &[PathBuf]) -> String {
    stack
        .iter()
        .map(|path| format!(" - {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    pub(crate) fn config_io(path: &Path, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn config_parse(path: &Path, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
