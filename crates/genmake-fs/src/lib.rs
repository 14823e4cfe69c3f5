//! Filesystem layer for arduino-genmakefile
//!
//! Provides three-domain path resolution, source scanning and the
//! safe-overwrite gate used before any generated file is replaced.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod scan;

pub use constants::GENERATED_MARKER;
pub use error::{EntryKind, Error, Result};
pub use path::{PathDomain, PathResolver, ProjectPath};
pub use scan::{containing_directories, scan};
