//! Rendering paths into descriptor syntax

use std::path::Path;

use genmake_fs::ProjectPath;

use crate::Result;

/// How a descriptor spells paths of each domain.
///
/// User-relative paths go through a home variable, absolute paths are
/// written literally, and base-relative paths are re-expressed against the
/// directory of the descriptor, optionally behind a variable naming that
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStyle {
    pub home_variable: &'static str,
    pub self_dir_variable: Option<&'static str>,
}

impl PathStyle {
    /// `$(HOME)/lib`, `$(MAKEFILE_DIR)/../lib`
    pub const MAKE: Self = Self {
        home_variable: "$(HOME)",
        self_dir_variable: Some("$(MAKEFILE_DIR)"),
    };

    /// `$$HOME/lib`, `../lib`
    pub const QMAKE: Self = Self {
        home_variable: "$$HOME",
        self_dir_variable: None,
    };

    /// Spell `path` for a descriptor living in `descriptor_dir`.
    pub fn reference(&self, path: &ProjectPath, descriptor_dir: &Path) -> Result<String> {
        let text = match path {
            ProjectPath::Absolute { location } => location.display().to_string(),
            ProjectPath::UserRelative { .. } => {
                format!("{}/{}", self.home_variable, path.relative_string()?)
            }
            ProjectPath::BaseRelative { .. } => {
                let relative = path.relativize(descriptor_dir)?.relative_string()?;
                match self.self_dir_variable {
                    Some(variable) => format!("{variable}/{relative}"),
                    None => relative,
                }
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genmake_fs::PathResolver;
    use genmake_test_utils::project::TestProject;
    use rstest::rstest;

    #[rstest]
    #[case::make_relative(PathStyle::MAKE, "../libA", "$(MAKEFILE_DIR)/../libA")]
    #[case::qmake_relative(PathStyle::QMAKE, "../libA", "../libA")]
    #[case::make_user(PathStyle::MAKE, "~/Arduino/libB", "$(HOME)/Arduino/libB")]
    #[case::qmake_user(PathStyle::QMAKE, "~/Arduino/libB", "$$HOME/Arduino/libB")]
    #[case::make_absolute(PathStyle::MAKE, "/genmake-absent/libC", "/genmake-absent/libC")]
    fn reference_by_domain(#[case] style: PathStyle, #[case] raw: &str, #[case] expected: &str) {
        let project = TestProject::new();
        let resolver = PathResolver::with_home_dir(project.path("home"));
        let descriptor_dir = project.path("proj");
        let path = resolver.resolve(raw, Some(&descriptor_dir)).unwrap();

        assert_eq!(style.reference(&path, &descriptor_dir).unwrap(), expected);
    }

    #[test]
    fn relative_reference_follows_descriptor_dir() {
        let project = TestProject::new();
        let lib = PathResolver::new()
            .resolve("libs/one", Some(project.root()))
            .unwrap();

        let reference = PathStyle::QMAKE
            .reference(&lib, &project.path("ide/qt"))
            .unwrap();
        assert_eq!(reference, "../../libs/one");
    }
}
