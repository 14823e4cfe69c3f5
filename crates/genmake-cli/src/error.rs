//! Error types for genmake-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from genmake-core
    #[error(transparent)]
    Core(#[from] genmake_core::Error),

    /// Error from genmake-fs
    #[error(transparent)]
    Fs(#[from] genmake_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
