//! Running the generated Makefile

use std::path::PathBuf;
use std::process::Command;

use genmake_fs::ProjectPath;

use crate::{Error, Result};

/// Program used to run Makefile rules unless configured otherwise.
pub const DEFAULT_MAKE_PROGRAM: &str = "make";

/// Runs a rule of a generated Makefile and returns its standard output.
pub trait BuildRunner {
    fn run_rule(&self, makefile: &ProjectPath, rule: &str) -> Result<String>;
}

/// Runs rules with `make -C <dir> -f <makefile> <rule>`.
#[derive(Debug, Clone)]
pub struct MakeRunner {
    program: PathBuf,
}

impl Default for MakeRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAKE_PROGRAM)
    }
}

impl MakeRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BuildRunner for MakeRunner {
    fn run_rule(&self, makefile: &ProjectPath, rule: &str) -> Result<String> {
        let dir = makefile.parent_dir();
        tracing::debug!(
            program = %self.program.display(),
            makefile = %makefile,
            rule,
            "Running build rule"
        );

        let output = Command::new(&self.program)
            .arg("-C")
            .arg(dir.location())
            .arg("-f")
            .arg(makefile.location())
            .arg(rule)
            .output()
            .map_err(|e| Error::BuildInvocationFailure {
                rule: rule.to_string(),
                diagnostics: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            return Err(Error::BuildInvocationFailure {
                rule: rule.to_string(),
                diagnostics: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
