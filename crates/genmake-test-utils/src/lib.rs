//! Shared test utilities for the arduino-genmakefile workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`project`]: [`project::TestProject`] builder for sketch/config trees
//! - [`toolchain`]: stand-in `make` programs for defines harvesting

pub mod project;
pub mod toolchain;
