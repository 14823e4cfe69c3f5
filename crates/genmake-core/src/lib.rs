//! Core generation layer for arduino-genmakefile
//!
//! This crate turns a sketch and a set of layered YAML configuration files
//! into build descriptors:
//!
//! - **Configuration composition**: recursive inclusion and ordered merging
//!   of configuration layers into one [`EffectiveConfig`]
//! - **Descriptor generation**: template rendering for the Makefile and the
//!   companion qmake project, with safe replacement of previous outputs
//! - **Pipeline**: validation, preflight and ordered generation for one run
//!
//! # Architecture
//!
//! `genmake-core` sits above the filesystem layer and below the CLI:
//!
//! ```text
//!           genmake-cli
//!                |
//!          genmake-core
//!     config  descriptor  pipeline
//!                |
//!           genmake-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use genmake_core::{ConfigComposer, GenerateRequest, GeneratedHeader, MakeRunner};
//!
//! let prepared = request.prepare(&ConfigComposer::new())?;
//! println!("{}", prepared.config());
//! let header = GeneratedHeader::from_args(std::env::args());
//! let report = prepared.generate(&header, &MakeRunner::default())?;
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod pipeline;

pub use config::{ConfigComposer, ConfigDocument, ConfigWarning, EffectiveConfig};
pub use descriptor::{
    BuildRunner, GeneratedHeader, MakeRunner, Makefile, QmakeProject, TemplateSource,
};
pub use error::{Error, Result};
pub use pipeline::{
    GenerateRequest, GenerationReport, GenerationWarning, PreparedGeneration, QmakeRequest,
};
