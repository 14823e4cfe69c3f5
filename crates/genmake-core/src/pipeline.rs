//! One generator run, from command-line paths to written files
//!
//! A run happens in two steps so callers can report the composed
//! configuration before anything is written:
//!
//! 1. [`GenerateRequest::prepare`] checks output names and required inputs,
//!    composes the configuration and verifies that every output may be
//!    overwritten. Nothing on disk changes.
//! 2. [`PreparedGeneration::generate`] writes the Makefile and then, when
//!    requested, the qmake project.

use std::fmt;
use std::time::{Duration, Instant};

use genmake_fs::ProjectPath;
use genmake_fs::io::check_files_exist;

use crate::config::{ConfigComposer, EffectiveConfig};
use crate::descriptor::{BuildRunner, GeneratedHeader, Makefile, QmakeProject, TemplateSource};
use crate::{Error, Result};

/// Non-fatal problem met while generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationWarning {
    /// The build used to harvest definitions failed; the qmake project was
    /// written without `DEFINES`.
    DefinesUnavailable { rule: String, diagnostics: String },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefinesUnavailable { rule, diagnostics } => write!(
                f,
                "Got an error while running the '{rule}' rule, DEFINES variable won't be set in your qmake project\nBuild output was:\n{diagnostics}"
            ),
        }
    }
}

/// The qmake part of a request.
#[derive(Debug, Clone)]
pub struct QmakeRequest {
    pub project: ProjectPath,
    pub template: TemplateSource,
}

/// Everything a run needs, with paths already resolved.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub sketch: ProjectPath,
    pub configs: Vec<ProjectPath>,
    pub makefile: ProjectPath,
    pub makefile_template: TemplateSource,
    pub qmake: Option<QmakeRequest>,
}

impl GenerateRequest {
    /// Inputs that must exist as regular files before anything is composed.
    pub fn required_files(&self) -> Vec<ProjectPath> {
        let mut required = vec![self.sketch.clone()];
        required.extend(self.configs.iter().cloned());
        let mut templates = vec![self.makefile_template.clone()];
        if let Some(qmake) = &self.qmake {
            templates.push(qmake.template.clone());
            templates.push(qmake.template.include_companion());
        }
        required.extend(templates.iter().filter_map(|t| t.file().cloned()));
        required
    }

    /// Validate, compose and preflight, without touching the disk.
    pub fn prepare(&self, composer: &ConfigComposer) -> Result<PreparedGeneration> {
        crate::descriptor::validate_makefile_name(&self.makefile)?;
        if let Some(qmake) = &self.qmake {
            crate::descriptor::validate_qmake_name(&qmake.project)?;
        }
        check_files_exist(&self.required_files())?;

        let config = composer.compose(&self.configs)?;

        let prepared = PreparedGeneration {
            request: self.clone(),
            config,
        };
        prepared.preflight()?;
        Ok(prepared)
    }
}

/// A request whose configuration is composed and whose outputs are known to
/// be safe to replace.
#[derive(Debug)]
pub struct PreparedGeneration {
    request: GenerateRequest,
    config: EffectiveConfig,
}

/// What a run wrote.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub written: Vec<ProjectPath>,
    pub warnings: Vec<GenerationWarning>,
    pub elapsed: Duration,
}

impl PreparedGeneration {
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    fn makefile(&self) -> Result<Makefile<'_>> {
        Makefile::new(
            &self.config,
            self.request.makefile.clone(),
            self.request.makefile_template.clone(),
            &self.request.sketch,
        )
    }

    fn qmake(&self) -> Result<Option<QmakeProject<'_>>> {
        let Some(qmake) = &self.request.qmake else {
            return Ok(None);
        };
        let project = QmakeProject::new(
            &self.config,
            qmake.project.clone(),
            qmake.template.clone(),
            &self.request.sketch,
            &self.request.makefile,
        )?;
        Ok(Some(project))
    }

    /// Fail before any write when an input is missing or an output is not
    /// ours to replace.
    fn preflight(&self) -> Result<()> {
        let makefile = self.makefile()?;
        makefile.check_inputs()?;

        let mut outputs = vec![makefile.path().clone()];
        if let Some(qmake) = self.qmake()? {
            outputs.extend(qmake.outputs());
        }
        for (index, output) in outputs.iter().enumerate() {
            if outputs[..index].contains(output) {
                return Err(Error::InvalidOutputName {
                    artifact: "qmake",
                    rule: "whose outputs do not collide with the Makefile",
                    path: output.location().to_path_buf(),
                });
            }
        }
        for output in &outputs {
            output.ensure_overwritable()?;
        }
        Ok(())
    }

    /// Write the Makefile, then the qmake project if one was requested.
    pub fn generate(
        &self,
        header: &GeneratedHeader,
        runner: &dyn BuildRunner,
    ) -> Result<GenerationReport> {
        let started = Instant::now();
        let mut written = Vec::new();
        let mut warnings = Vec::new();

        let makefile = self.makefile()?;
        makefile.generate(header)?;
        written.push(makefile.path().clone());

        if let Some(qmake) = self.qmake()? {
            let outcome = qmake.generate(header, runner)?;
            written.extend(outcome.written);
            warnings.extend(outcome.warnings);
        }

        let elapsed = started.elapsed();
        tracing::debug!(files = written.len(), ?elapsed, "Generation finished");
        Ok(GenerationReport {
            written,
            warnings,
            elapsed,
        })
    }
}
