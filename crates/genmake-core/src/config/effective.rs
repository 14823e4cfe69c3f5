//! The merged configuration every generator reads from

use std::fmt;

use genmake_fs::ProjectPath;

/// Command run by the `debug` rule unless a layer overrides it.
pub const DEFAULT_DEBUG_COMMAND: &str = "cat $$SERIALPORT";

/// Serial speed used unless a layer overrides it.
pub const DEFAULT_BAUDRATE: &str = "115200";

/// Non-fatal problem found while composing the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A layer declared a key the generator does not know
    UnknownKey { key: String, path: ProjectPath },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key, path } => {
                write!(f, "unhandled key {key} in configuration file {path}")
            }
        }
    }
}

/// The final configuration after merging all layers
///
/// Built once per run by [`ConfigComposer`](super::ConfigComposer) and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    /// Fully qualified board name
    pub fqbn: String,

    /// Compiler flags from every layer, in layer order
    pub cflags: Vec<String>,

    pub debug_command: String,

    pub baudrate: String,

    /// Library directories, each resolved against its declaring file
    pub lib_paths: Vec<ProjectPath>,

    /// Extra directories scanned for the qmake project
    pub qmake_dirs: Vec<ProjectPath>,

    /// Directories excluded from the qmake scan
    pub qmake_exclude_dirs: Vec<ProjectPath>,

    /// Configuration files given on the command line
    pub main_paths: Vec<ProjectPath>,

    /// Every file that contributed, main files followed by their includes
    pub paths: Vec<ProjectPath>,

    /// Non-fatal problems found while composing
    pub warnings: Vec<ConfigWarning>,
}

impl EffectiveConfig {
    /// Included files, i.e. contributing files that were not given directly.
    pub fn sub_paths(&self) -> impl Iterator<Item = &ProjectPath> {
        self.paths
            .iter()
            .filter(|path| !self.main_paths.contains(path))
    }
}

fn title(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, " * {title}:")
}

fn item(f: &mut fmt::Formatter<'_>, item: impl fmt::Display) -> fmt::Result {
    writeln!(f, "   - {item}")
}

impl fmt::Display for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        title(f, "main configuration paths")?;
        for path in &self.main_paths {
            item(f, path)?;
        }

        title(f, "sub configurations")?;
        for path in self.sub_paths() {
            item(f, path)?;
        }

        title(f, "fqbn")?;
        item(f, &self.fqbn)?;

        title(f, "libs")?;
        for path in &self.lib_paths {
            item(f, path)?;
        }

        title(f, "cflags")?;
        for flag in &self.cflags {
            item(f, flag)?;
        }
        Ok(())
    }
}
