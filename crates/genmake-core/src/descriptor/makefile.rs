//! The primary descriptor: a Makefile driving `arduino-cli`

use std::path::{Path, PathBuf};

use genmake_fs::ProjectPath;
use genmake_fs::io::check_dirs_exist;

use super::{GeneratedHeader, PathStyle, Substitution, TemplateSource, find_placeholder, render};
use crate::config::EffectiveConfig;
use crate::{Error, Result};

/// Every Makefile name must start with this.
pub(crate) const MAKEFILE_PREFIX: &str = "Makefile";

#[derive(Debug, Clone, Copy)]
enum Placeholder {
    Libs,
    Fqbn,
    BinDir,
    BinFile,
    CFlags,
    SketchNoExt,
    DebugCommand,
    Baudrate,
}

const PLACEHOLDERS: [(Placeholder, &str); 8] = [
    (Placeholder::Libs, "LIBS_PLACEHOLDER"),
    (Placeholder::Fqbn, "FQBN_PLACEHOLDER"),
    (Placeholder::BinDir, "BINDIR_PLACEHOLDER"),
    (Placeholder::BinFile, "BINFILE_PLACEHOLDER"),
    (Placeholder::CFlags, "CFLAGS_PLACEHOLDER"),
    (Placeholder::SketchNoExt, "SKETCH_NOEXT_PLACEHOLDER"),
    (Placeholder::DebugCommand, "DEBUG_COMMAND_PLACEHOLDER"),
    (Placeholder::Baudrate, "BAUDRATE_PLACEHOLDER"),
];

/// A Makefile to be generated for one sketch.
#[derive(Debug)]
pub struct Makefile<'a> {
    config: &'a EffectiveConfig,
    path: ProjectPath,
    template: TemplateSource,
    sketch: ProjectPath,
}

impl<'a> Makefile<'a> {
    /// `path` must be named `Makefile*`.
    pub fn new(
        config: &'a EffectiveConfig,
        path: ProjectPath,
        template: TemplateSource,
        sketch: &ProjectPath,
    ) -> Result<Self> {
        validate_name(&path)?;
        let sketch = sketch.relativize(path.parent_dir().location())?;
        Ok(Self {
            config,
            path,
            template,
            sketch,
        })
    }

    pub fn path(&self) -> &ProjectPath {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        self.path.parent_dir().location().to_path_buf()
    }

    /// Fail unless every library directory exists.
    pub fn check_inputs(&self) -> Result<()> {
        check_dirs_exist(&self.config.lib_paths)?;
        Ok(())
    }

    /// Render the Makefile in memory.
    pub fn render(&self, header: &GeneratedHeader) -> Result<Vec<String>> {
        self.check_inputs()?;
        let template = self.template.load()?;
        let substitution = MakefileValues {
            makefile: self,
            dir: self.dir(),
        };
        render(&template, header, &substitution)
    }

    /// Render, then replace any previous Makefile with the result.
    pub fn generate(&self, header: &GeneratedHeader) -> Result<()> {
        let lines = self.render(header)?;
        self.path.safe_remove_if_present()?;
        self.path.write_lines(&lines)?;
        tracing::info!(path = %self.path, "Generated Makefile");
        Ok(())
    }

    /// Output directory name: `bin` followed by whatever comes after
    /// `Makefile` in the file name, so `Makefile.debug` builds into
    /// `bin.debug`.
    pub fn bin_dir_name(&self) -> String {
        let name = self.path.file_name().unwrap_or(MAKEFILE_PREFIX);
        let suffix = name
            .strip_prefix(MAKEFILE_PREFIX)
            .map_or_else(|| name.replacen(MAKEFILE_PREFIX, "", 1), str::to_string);
        format!("bin{suffix}")
    }

    /// Name of the firmware image the toolchain produces.
    pub fn bin_file_name(&self) -> String {
        self.sketch
            .with_suffix(".ino.bin")
            .file_name()
            .unwrap_or_default()
            .to_string()
    }

    /// The sketch relative to the Makefile, without extension.
    pub fn sketch_stem(&self) -> Result<String> {
        Ok(self.sketch.with_suffix("").relative_string()?)
    }
}

pub(crate) fn validate_name(path: &ProjectPath) -> Result<()> {
    let valid = path
        .file_name()
        .is_some_and(|name| name.starts_with(MAKEFILE_PREFIX));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidOutputName {
            artifact: "Makefile",
            rule: "starting with 'Makefile'",
            path: path.location().to_path_buf(),
        })
    }
}

struct MakefileValues<'m, 'a> {
    makefile: &'m Makefile<'a>,
    dir: PathBuf,
}

impl MakefileValues<'_, '_> {
    fn libraries(&self, dir: &Path) -> Result<Vec<String>> {
        self.makefile
            .config
            .lib_paths
            .iter()
            .map(|lib| {
                let reference = PathStyle::MAKE.reference(lib, dir)?;
                Ok(format!("\t\t--library \"{reference}\" \\"))
            })
            .collect()
    }
}

impl Substitution for MakefileValues<'_, '_> {
    fn expand(&self, line: &str) -> Result<Option<Vec<String>>> {
        let Some((placeholder, token)) = find_placeholder(line, &PLACEHOLDERS) else {
            return Ok(None);
        };
        let config = self.makefile.config;
        let value = match placeholder {
            Placeholder::Libs => return self.libraries(&self.dir).map(Some),
            Placeholder::Fqbn => config.fqbn.clone(),
            Placeholder::BinDir => self.makefile.bin_dir_name(),
            Placeholder::BinFile => self.makefile.bin_file_name(),
            Placeholder::CFlags => config.cflags.join(" "),
            Placeholder::SketchNoExt => self.makefile.sketch_stem()?,
            Placeholder::DebugCommand => config.debug_command.clone(),
            Placeholder::Baudrate => config.baudrate.clone(),
        };
        Ok(Some(vec![line.replace(token, &value)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BAUDRATE, DEFAULT_DEBUG_COMMAND};
    use crate::descriptor::Template;
    use genmake_fs::PathResolver;
    use genmake_test_utils::project::TestProject;
    use pretty_assertions::assert_eq;

    fn config(lib_paths: Vec<ProjectPath>) -> EffectiveConfig {
        EffectiveConfig {
            fqbn: "arduino:avr:uno".into(),
            cflags: vec!["-DA".into(), "-Os".into()],
            debug_command: DEFAULT_DEBUG_COMMAND.into(),
            baudrate: DEFAULT_BAUDRATE.into(),
            lib_paths,
            qmake_dirs: Vec::new(),
            qmake_exclude_dirs: Vec::new(),
            main_paths: Vec::new(),
            paths: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn resolve(project: &TestProject, raw: &str) -> ProjectPath {
        PathResolver::new().resolve(raw, Some(project.root())).unwrap()
    }

    #[test]
    fn rejects_bad_names() {
        let project = TestProject::new();
        let config = config(Vec::new());
        let sketch = resolve(&project, "s/s.ino");

        let err = Makefile::new(
            &config,
            resolve(&project, "build.mk"),
            TemplateSource::builtin_makefile(),
            &sketch,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOutputName { .. }));
    }

    #[test]
    fn derived_names() {
        let project = TestProject::new();
        let config = config(Vec::new());
        let makefile = Makefile::new(
            &config,
            resolve(&project, "out/Makefile.debug"),
            TemplateSource::builtin_makefile(),
            &resolve(&project, "src/blink/blink.ino"),
        )
        .unwrap();

        assert_eq!(makefile.bin_dir_name(), "bin.debug");
        assert_eq!(makefile.bin_file_name(), "blink.ino.bin");
        assert_eq!(makefile.sketch_stem().unwrap(), "../src/blink/blink");
    }

    #[test]
    fn substitutes_each_placeholder() {
        let project = TestProject::new();
        project.create_dir("libA");
        let config = config(vec![resolve(&project, "libA")]);
        let makefile = Makefile::new(
            &config,
            resolve(&project, "proj/Makefile"),
            TemplateSource::builtin_makefile(),
            &resolve(&project, "proj/sketch.ino"),
        )
        .unwrap();
        let values = MakefileValues {
            makefile: &makefile,
            dir: makefile.dir(),
        };

        let expand = |line: &str| values.expand(line).unwrap();
        assert_eq!(
            expand("FQBN := FQBN_PLACEHOLDER"),
            Some(vec!["FQBN := arduino:avr:uno".to_string()])
        );
        assert_eq!(expand("x CFLAGS_PLACEHOLDER"), Some(vec!["x -DA -Os".to_string()]));
        assert_eq!(expand("BINDIR_PLACEHOLDER"), Some(vec!["bin".to_string()]));
        assert_eq!(expand("SKETCH_NOEXT_PLACEHOLDER.ino"), Some(vec!["sketch.ino".to_string()]));
        assert_eq!(
            expand("\t\tLIBS_PLACEHOLDER"),
            Some(vec!["\t\t--library \"$(MAKEFILE_DIR)/../libA\" \\".to_string()])
        );
        assert_eq!(expand("plain line"), None);
    }

    #[test]
    fn missing_library_fails_before_writing() {
        let project = TestProject::new();
        let config = config(vec![resolve(&project, "absent-lib")]);
        let makefile = Makefile::new(
            &config,
            resolve(&project, "Makefile"),
            TemplateSource::builtin_makefile(),
            &resolve(&project, "sketch.ino"),
        )
        .unwrap();

        let err = makefile.generate(&GeneratedHeader::new("x")).unwrap_err();

        assert!(matches!(
            err,
            Error::Fs(genmake_fs::Error::RequiredFileMissing { .. })
        ));
        project.assert_file_not_exists("Makefile");
    }

    #[test]
    fn libs_line_without_libraries_disappears() {
        let project = TestProject::new();
        let config = config(Vec::new());
        let makefile = Makefile::new(
            &config,
            resolve(&project, "Makefile"),
            TemplateSource::builtin_makefile(),
            &resolve(&project, "sketch.ino"),
        )
        .unwrap();
        let values = MakefileValues {
            makefile: &makefile,
            dir: makefile.dir(),
        };

        let rendered = render(
            &Template::from_text("a \\\n\t\tLIBS_PLACEHOLDER\nb"),
            &GeneratedHeader::new("x"),
            &values,
        )
        .unwrap();
        assert_eq!(&rendered[5..], &["a \\", "b"]);
    }
}
