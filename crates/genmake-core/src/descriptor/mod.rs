//! Descriptor generation
//!
//! Every generated file is produced the same way: a template is read line by
//! line, a [`GeneratedHeader`] is emitted first, and each template line that
//! contains a placeholder token is replaced by zero or more rendered lines.
//! Lines without a placeholder are copied verbatim.
//!
//! Writing follows a fixed order so a failure never leaves a half-rendered
//! file behind:
//!
//! 1. compute the values to substitute (may scan the disk or run a build)
//! 2. render every line in memory
//! 3. remove the previous output, which must be empty or carry the marker
//! 4. write the rendered lines
//!
//! Two generators are provided: [`Makefile`], the primary descriptor, and
//! [`QmakeProject`], a companion IDE project derived from the Makefile.

mod defines;
mod makefile;
mod qmake;
mod reference;
mod template;
mod toolchain;

pub use defines::{harvest_defines, parse_defines, qmake_define};
pub use makefile::Makefile;
pub(crate) use makefile::validate_name as validate_makefile_name;
pub use qmake::{QmakeContext, QmakeOutcome, QmakeProject};
pub(crate) use qmake::validate_name as validate_qmake_name;
pub use reference::PathStyle;
pub use template::{Template, TemplateSource};
pub use toolchain::{BuildRunner, DEFAULT_MAKE_PROGRAM, MakeRunner};

use std::path::Path;

use genmake_fs::GENERATED_MARKER;

use crate::Result;

/// The comment block at the top of every generated file.
///
/// Records the command line that produced the file, so it can be
/// regenerated by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    command_line: String,
}

impl GeneratedHeader {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
        }
    }

    /// Build the header from process arguments.
    ///
    /// The program is reduced to its file name so the header does not leak
    /// the install location.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = Vec::new();
        for (index, arg) in args.into_iter().enumerate() {
            let arg = arg.as_ref();
            if index == 0 {
                let program = Path::new(arg)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(arg);
                words.push(program.to_string());
            } else {
                words.push(arg.to_string());
            }
        }
        Self::new(words.join(" "))
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            GENERATED_MARKER.to_string(),
            "#".to_string(),
            "# Command line:".to_string(),
            format!("# {}", self.command_line),
            String::new(),
        ]
    }
}

/// Placeholder expansion for one kind of descriptor.
pub trait Substitution {
    /// Expand `line` if it contains a placeholder.
    ///
    /// Returns `None` for lines to copy verbatim. An expansion may be empty,
    /// which drops the line.
    fn expand(&self, line: &str) -> Result<Option<Vec<String>>>;
}

/// Render `template` below `header`, expanding placeholders through
/// `substitution`.
pub fn render(
    template: &Template,
    header: &GeneratedHeader,
    substitution: &impl Substitution,
) -> Result<Vec<String>> {
    let mut rendered = header.lines();
    for line in template.lines() {
        match substitution.expand(line)? {
            Some(expanded) => rendered.extend(expanded),
            None => rendered.push(line.clone()),
        }
    }
    Ok(rendered)
}

/// Find the first of `tokens` present in `line`.
///
/// Order matters: tokens are checked in the order given and only the first
/// match is expanded.
pub(crate) fn find_placeholder<P: Copy>(
    line: &str,
    tokens: &[(P, &'static str)],
) -> Option<(P, &'static str)> {
    tokens.iter().find(|(_, token)| line.contains(token)).copied()
}
