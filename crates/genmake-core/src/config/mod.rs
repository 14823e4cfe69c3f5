//! Configuration composition
//!
//! A project is described by one or more YAML files, given in order on the
//! command line. Each file may include further files through its `configs`
//! key; includes are resolved against the including file's directory and
//! expanded depth-first.
//!
//! # Merge rules
//!
//! | key | merge |
//! |---|---|
//! | `fqbn` | last layer wins, required |
//! | `cflags` | appended |
//! | `debug_command`, `baudrate` | last layer wins |
//! | `libs`, `qmake_dirs`, `qmake_exclude_dirs` | appended, resolved against the declaring file |
//!
//! Unknown keys produce a [`ConfigWarning`] and are otherwise ignored.
//!
//! # Example
//!
//! ```ignore
//! use genmake_core::config::ConfigComposer;
//! use genmake_fs::PathResolver;
//!
//! let cwd = std::env::current_dir()?;
//! let board = PathResolver::new().resolve("board.yaml", Some(&cwd))?;
//! let config = ConfigComposer::new().compose(&[board])?;
//! println!("{config}");
//! ```

mod composer;
mod document;
mod effective;

pub use composer::ConfigComposer;
pub use document::ConfigDocument;
pub use effective::{ConfigWarning, DEFAULT_BAUDRATE, DEFAULT_DEBUG_COMMAND, EffectiveConfig};
