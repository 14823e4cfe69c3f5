//! Command implementations for genmake-cli

pub mod generate;

pub use generate::run_generate;
