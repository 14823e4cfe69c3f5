//! Template sources
//!
//! Templates ship with the crate and can be replaced by user files. A qmake
//! template always travels with its `.pri` companion, found next to it.

use genmake_fs::ProjectPath;

use crate::{Error, Result};

const BUILTIN_MAKEFILE: &str = include_str!("../../templates/Makefile");
const BUILTIN_QMAKE: &str = include_str!("../../templates/qmake.pro");
const BUILTIN_QMAKE_INCLUDE: &str = include_str!("../../templates/qmake.pri");

/// Where a template's lines come from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compiled into the binary
    Builtin {
        name: &'static str,
        content: &'static str,
    },
    /// A user-supplied file
    File(ProjectPath),
}

impl TemplateSource {
    pub fn builtin_makefile() -> Self {
        Self::Builtin {
            name: "Makefile",
            content: BUILTIN_MAKEFILE,
        }
    }

    pub fn builtin_qmake() -> Self {
        Self::Builtin {
            name: "qmake.pro",
            content: BUILTIN_QMAKE,
        }
    }

    pub fn builtin_qmake_include() -> Self {
        Self::Builtin {
            name: "qmake.pri",
            content: BUILTIN_QMAKE_INCLUDE,
        }
    }

    /// The `.pri` template belonging to this `.pro` template.
    pub fn include_companion(&self) -> Self {
        match self {
            Self::Builtin { .. } => Self::builtin_qmake_include(),
            Self::File(path) => Self::File(path.with_suffix(".pri")),
        }
    }

    /// The file backing this template, if it is not built in.
    pub fn file(&self) -> Option<&ProjectPath> {
        match self {
            Self::Builtin { .. } => None,
            Self::File(path) => Some(path),
        }
    }

    pub fn load(&self) -> Result<Template> {
        match self {
            Self::Builtin { content, .. } => Ok(Template::from_text(content)),
            Self::File(path) => {
                let lines = path.read_lines().map_err(|source| Error::TemplateIo {
                    path: path.location().to_path_buf(),
                    source,
                })?;
                Ok(Template { lines })
            }
        }
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin { name, .. } => write!(f, "built-in {name}"),
            Self::File(path) => write!(f, "{path}"),
        }
    }
}

/// A loaded template, as lines without terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
}

impl Template {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
