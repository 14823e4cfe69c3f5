//! The companion descriptor: a qmake project for Qt Creator
//!
//! Three files are written next to each other:
//!
//! - `<name>.pro`, listing files reachable through relative paths, so the
//!   project can be moved along with its sources;
//! - `<name>.pri`, included by the `.pro`, listing absolute and home-relative
//!   files, which are machine specific;
//! - `<name>`, an executable script running the Makefile's `run` rule, used
//!   as the run target in the IDE.
//!
//! Preprocessor definitions are harvested from a real build through the
//! Makefile, which must therefore be generated first.

use std::path::{Path, PathBuf};

use genmake_fs::io::check_files_exist;
use genmake_fs::{PathDomain, ProjectPath, containing_directories, scan};

use super::defines::{harvest_defines, qmake_define};
use super::{
    BuildRunner, GeneratedHeader, PathStyle, Substitution, TemplateSource, find_placeholder,
    render,
};
use crate::config::EffectiveConfig;
use crate::pipeline::GenerationWarning;
use crate::{Error, Result};

const PROJECT_SUFFIX: &str = ".pro";
const INCLUDE_SUFFIX: &str = ".pri";
const SCRIPT_SHEBANG: &str = "#!/bin/sh";

const HEADER_EXTENSIONS: [&str; 2] = [".h", ".hpp"];
const SOURCE_EXTENSIONS: [&str; 2] = [".c", ".cpp"];

#[derive(Debug, Clone, Copy)]
enum Placeholder {
    Target,
    Makefile,
    IncludeFile,
    Defines,
    OtherFiles,
    Sources,
    Headers,
    IncludePath,
}

const PLACEHOLDERS: [(Placeholder, &str); 8] = [
    (Placeholder::Target, "TARGET_PLACEHOLDER"),
    (Placeholder::Makefile, "MAKEFILE_PLACEHOLDER"),
    (Placeholder::IncludeFile, "PRIFILE_PLACEHOLDER"),
    (Placeholder::Defines, "DEFINES_PLACEHOLDER"),
    (Placeholder::OtherFiles, "OTHER_FILES_PLACEHOLDER"),
    (Placeholder::Sources, "SOURCES_PLACEHOLDER"),
    (Placeholder::Headers, "HEADERS_PLACEHOLDER"),
    (Placeholder::IncludePath, "INCLUDEPATH_PLACEHOLDER"),
];

/// Files and definitions listed in the qmake project.
#[derive(Debug, Clone, Default)]
pub struct QmakeContext {
    /// The Makefile and every configuration file
    pub other_files: Vec<ProjectPath>,
    pub headers: Vec<ProjectPath>,
    /// The sketch followed by scanned C and C++ sources
    pub sources: Vec<ProjectPath>,
    /// Directories containing at least one header
    pub include_paths: Vec<ProjectPath>,
    /// `-D` flags harvested from the build
    pub defines: Vec<String>,
}

/// What a qmake generation wrote, and what went wrong without failing it.
#[derive(Debug, Clone)]
pub struct QmakeOutcome {
    pub written: Vec<ProjectPath>,
    pub warnings: Vec<GenerationWarning>,
}

/// A qmake project to be generated alongside a Makefile.
#[derive(Debug)]
pub struct QmakeProject<'a> {
    config: &'a EffectiveConfig,
    path: ProjectPath,
    template: TemplateSource,
    sketch: ProjectPath,
    makefile: ProjectPath,
}

impl<'a> QmakeProject<'a> {
    /// `path` must end in `.pro`.
    pub fn new(
        config: &'a EffectiveConfig,
        path: ProjectPath,
        template: TemplateSource,
        sketch: &ProjectPath,
        makefile: &ProjectPath,
    ) -> Result<Self> {
        validate_name(&path)?;
        let dir = path.parent_dir();
        Ok(Self {
            config,
            sketch: sketch.relativize(dir.location())?,
            makefile: makefile.relativize(dir.location())?,
            path,
            template,
        })
    }

    pub fn path(&self) -> &ProjectPath {
        &self.path
    }

    /// The `.pri` file included by the project.
    pub fn include_path(&self) -> ProjectPath {
        self.path.with_suffix(INCLUDE_SUFFIX)
    }

    /// The run script, named after the project without extension.
    pub fn script_path(&self) -> ProjectPath {
        self.path.with_suffix("")
    }

    /// Every file this project writes.
    pub fn outputs(&self) -> Vec<ProjectPath> {
        vec![self.path.clone(), self.include_path(), self.script_path()]
    }

    fn dir(&self) -> PathBuf {
        self.path.parent_dir().location().to_path_buf()
    }

    /// Scan for sources and headers, and harvest definitions from a build.
    ///
    /// A failed build is not an error: the project is still useful without
    /// definitions, so the failure is returned as a warning instead.
    pub fn collect(
        &self,
        runner: &dyn BuildRunner,
    ) -> Result<(QmakeContext, Option<GenerationWarning>)> {
        let config = self.config;

        let mut roots = vec![self.sketch.parent_dir()];
        roots.extend(config.lib_paths.iter().cloned());
        roots.extend(config.qmake_dirs.iter().cloned());
        let excluded = &config.qmake_exclude_dirs;

        let headers = scan(&roots, &HEADER_EXTENSIONS, excluded);
        let mut sources = vec![self.sketch.clone()];
        sources.extend(scan(&roots, &SOURCE_EXTENSIONS, excluded));
        let include_paths = containing_directories(&headers);

        let mut other_files = vec![self.makefile.clone()];
        other_files.extend(config.paths.iter().cloned());

        tracing::debug!(
            headers = headers.len(),
            sources = sources.len(),
            include_paths = include_paths.len(),
            "Scanned qmake project files"
        );

        let (defines, warning) = match harvest_defines(runner, &self.makefile) {
            Ok(defines) => (defines, None),
            Err(Error::BuildInvocationFailure { rule, diagnostics }) => {
                tracing::warn!(rule = %rule, "Build failed, DEFINES will not be set");
                (
                    Vec::new(),
                    Some(GenerationWarning::DefinesUnavailable { rule, diagnostics }),
                )
            }
            Err(other) => return Err(other),
        };

        let context = QmakeContext {
            other_files,
            headers,
            sources,
            include_paths,
            defines,
        };
        Ok((context, warning))
    }

    /// Render the `.pro` and `.pri` files in memory.
    pub fn render(
        &self,
        header: &GeneratedHeader,
        context: &QmakeContext,
    ) -> Result<(Vec<String>, Vec<String>)> {
        let dir = self.dir();
        let project = QmakeValues {
            project: self,
            context,
            dir: &dir,
            domains: &[PathDomain::BaseRelative],
        };
        let include = QmakeValues {
            project: self,
            context,
            dir: &dir,
            domains: &[PathDomain::Absolute, PathDomain::UserRelative],
        };

        let pro = render(&self.template.load()?, header, &project)?;
        let pri = render(&self.template.include_companion().load()?, header, &include)?;
        Ok((pro, pri))
    }

    /// Render the run script in memory.
    pub fn render_script(&self, header: &GeneratedHeader) -> Result<Vec<String>> {
        let script_dir = self.script_path().parent_dir();
        let makefile = self.makefile.relativize(script_dir.location())?;

        let mut lines = vec![SCRIPT_SHEBANG.to_string()];
        lines.extend(header.lines());
        lines.push(format!("make -f {} run", makefile.relative_string()?));
        Ok(lines)
    }

    /// Generate the project, its include file and its run script.
    ///
    /// The Makefile must already exist. Nothing is removed or written until
    /// all three files are rendered.
    pub fn generate(
        &self,
        header: &GeneratedHeader,
        runner: &dyn BuildRunner,
    ) -> Result<QmakeOutcome> {
        check_files_exist([&self.makefile])?;

        let (context, warning) = self.collect(runner)?;
        let (pro, pri) = self.render(header, &context)?;
        let script = self.render_script(header)?;

        let outputs = [
            (self.path.clone(), pro),
            (self.include_path(), pri),
            (self.script_path(), script),
        ];
        for (path, _) in &outputs {
            path.safe_remove_if_present()?;
        }
        for (path, lines) in &outputs {
            path.write_lines(lines)?;
        }
        self.script_path().mark_executable()?;
        tracing::info!(path = %self.path, "Generated qmake project");

        Ok(QmakeOutcome {
            written: outputs.into_iter().map(|(path, _)| path).collect(),
            warnings: warning.into_iter().collect(),
        })
    }
}

pub(crate) fn validate_name(path: &ProjectPath) -> Result<()> {
    let valid = path
        .file_name()
        .is_some_and(|name| name.ends_with(PROJECT_SUFFIX));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidOutputName {
            artifact: "qmake",
            rule: "ending with '.pro'",
            path: path.location().to_path_buf(),
        })
    }
}

/// Placeholder values for one of the two qmake files.
///
/// File lists only carry the entries whose domain belongs in that file.
struct QmakeValues<'q, 'a> {
    project: &'q QmakeProject<'a>,
    context: &'q QmakeContext,
    dir: &'q Path,
    domains: &'q [PathDomain],
}

impl QmakeValues<'_, '_> {
    fn file_entries(&self, paths: &[ProjectPath]) -> Result<Vec<String>> {
        paths
            .iter()
            .filter(|path| self.domains.contains(&path.domain()))
            .map(|path| {
                let reference = PathStyle::QMAKE.reference(path, self.dir)?;
                Ok(format!("\t{reference} \\"))
            })
            .collect()
    }

    fn relative(&self, path: &ProjectPath) -> Result<String> {
        Ok(path.relativize(self.dir)?.relative_string()?)
    }
}

impl Substitution for QmakeValues<'_, '_> {
    fn expand(&self, line: &str) -> Result<Option<Vec<String>>> {
        let Some((placeholder, token)) = find_placeholder(line, &PLACEHOLDERS) else {
            return Ok(None);
        };
        let context = self.context;
        let value = match placeholder {
            Placeholder::Target => self.relative(&self.project.script_path())?,
            Placeholder::Makefile => self.relative(&self.project.makefile)?,
            Placeholder::IncludeFile => self.relative(&self.project.include_path())?,
            Placeholder::Defines => {
                let entries = context
                    .defines
                    .iter()
                    .map(|define| format!("\t{} \\", qmake_define(define)))
                    .collect();
                return Ok(Some(entries));
            }
            Placeholder::OtherFiles => return self.file_entries(&context.other_files).map(Some),
            Placeholder::Sources => return self.file_entries(&context.sources).map(Some),
            Placeholder::Headers => return self.file_entries(&context.headers).map(Some),
            Placeholder::IncludePath => {
                return self.file_entries(&context.include_paths).map(Some);
            }
        };
        Ok(Some(vec![line.replace(token, &value)]))
    }
}
