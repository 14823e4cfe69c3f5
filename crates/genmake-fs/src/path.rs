//! Path domains and canonical locations
//!
//! Every path the generator handles is written by a user in one of three
//! forms, and the form matters when the path is rendered back into a
//! generated file:
//!
//! - `~/some/lib` is relative to the user's home and is rendered through a
//!   home variable, so the generated file works for any user.
//! - `/opt/some/lib` is absolute and is rendered literally.
//! - `some/lib` is relative to a base directory (the invocation directory, or
//!   the directory of the configuration file declaring it) and is rendered
//!   relative to the directory of whichever file references it.
//!
//! Regardless of domain, a [`ProjectPath`] always carries the canonical,
//! symlink-resolved absolute location, which is what equality compares.

use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Prefix marking a path as relative to the user's home directory.
const HOME_PREFIX: &str = "~/";

/// A resolved path tagged with the domain it was written in.
#[derive(Debug, Clone)]
pub enum ProjectPath {
    /// Written as an absolute path.
    Absolute { location: PathBuf },
    /// Written relative to the user's home directory (`~/...`).
    UserRelative { location: PathBuf, home: PathBuf },
    /// Written relative to `base`, which is always absolute.
    BaseRelative { location: PathBuf, base: PathBuf },
}

/// Domain of a [`ProjectPath`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDomain {
    Absolute,
    UserRelative,
    BaseRelative,
}

/// Resolves raw path strings into [`ProjectPath`]s.
///
/// The home directory is looked up with `dirs::home_dir()` unless an override
/// is given, which keeps tests independent of the real home.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    home_override: Option<PathBuf>,
}

impl PathResolver {
    /// Create a resolver using the platform home directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver expanding `~/` against `home` instead of the real
    /// home directory.
    pub fn with_home_dir(home: impl Into<PathBuf>) -> Self {
        Self {
            home_override: Some(home.into()),
        }
    }

    fn home_dir(&self) -> Result<PathBuf> {
        let home = match &self.home_override {
            Some(home) => home.clone(),
            None => dirs::home_dir().ok_or(Error::HomeDirectoryUnavailable)?,
        };
        Ok(real_location(&home))
    }

    /// Classify `raw` and resolve it to its canonical location.
    ///
    /// `base` is only consulted for base-relative paths, and must then be an
    /// absolute path that is either missing or a directory.
    pub fn resolve(&self, raw: &str, base: Option<&Path>) -> Result<ProjectPath> {
        if let Some(rest) = raw.strip_prefix(HOME_PREFIX) {
            let home = self.home_dir()?;
            let location = real_location(&home.join(rest));
            return Ok(ProjectPath::UserRelative { location, home });
        }

        let raw_path = Path::new(raw);
        if raw_path.is_absolute() {
            return Ok(ProjectPath::Absolute {
                location: real_location(raw_path),
            });
        }

        let base = base.ok_or_else(|| Error::invalid_base(raw, "no base directory given"))?;
        let base = validate_base_dir(base)?;
        let location = real_location(&base.join(raw_path));
        tracing::trace!(raw, ?base, ?location, "Resolved base-relative path");
        Ok(ProjectPath::BaseRelative { location, base })
    }
}

impl ProjectPath {
    /// The canonical absolute location.
    pub fn location(&self) -> &Path {
        match self {
            Self::Absolute { location }
            | Self::UserRelative { location, .. }
            | Self::BaseRelative { location, .. } => location,
        }
    }

    pub fn domain(&self) -> PathDomain {
        match self {
            Self::Absolute { .. } => PathDomain::Absolute,
            Self::UserRelative { .. } => PathDomain::UserRelative,
            Self::BaseRelative { .. } => PathDomain::BaseRelative,
        }
    }

    /// Re-express the same location relative to `new_base`.
    pub fn relativize(&self, new_base: impl AsRef<Path>) -> Result<Self> {
        let base = validate_base_dir(new_base.as_ref())?;
        Ok(Self::BaseRelative {
            location: self.location().to_path_buf(),
            base,
        })
    }

    /// The relative text of this path.
    ///
    /// Base-relative paths are relative to their base, user-relative paths to
    /// the home directory. Absolute paths have no relative form.
    pub fn relative_string(&self) -> Result<String> {
        match self {
            Self::Absolute { location } => Err(Error::NotRelative {
                path: location.clone(),
            }),
            Self::UserRelative { location, home: base }
            | Self::BaseRelative { location, base } => {
                Ok(relative_path(location, base).to_string_lossy().into_owned())
            }
        }
    }

    /// Sibling path with the extension replaced; an empty `ext` strips it.
    ///
    /// `ext` may be given with or without its leading dot.
    pub fn with_suffix(&self, ext: &str) -> Self {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        self.in_same_domain(self.location().with_extension(ext))
    }

    /// The containing directory, in the same domain.
    pub fn parent_dir(&self) -> Self {
        let parent = self
            .location()
            .parent()
            .map_or_else(|| self.location().to_path_buf(), Path::to_path_buf);
        self.in_same_domain(parent)
    }

    /// Express another canonical `location` in this path's domain.
    pub fn in_same_domain(&self, location: PathBuf) -> Self {
        match self {
            Self::Absolute { .. } => Self::Absolute { location },
            Self::UserRelative { home, .. } => Self::UserRelative {
                location,
                home: home.clone(),
            },
            Self::BaseRelative { base, .. } => Self::BaseRelative {
                location,
                base: base.clone(),
            },
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.location().file_name().and_then(|name| name.to_str())
    }

    pub fn exists(&self) -> bool {
        self.location().exists()
    }

    pub fn exists_as_file(&self) -> bool {
        self.location().is_file()
    }

    pub fn exists_as_directory(&self) -> bool {
        self.location().is_dir()
    }

    pub fn is_empty_file(&self) -> bool {
        self.location()
            .metadata()
            .map(|meta| meta.is_file() && meta.len() == 0)
            .unwrap_or(false)
    }
}

// Two paths are the same path when they name the same file, whatever domain
// they were written in.
impl PartialEq for ProjectPath {
    fn eq(&self, other: &Self) -> bool {
        self.location() == other.location()
    }
}

impl Eq for ProjectPath {}

impl Hash for ProjectPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location().hash(state);
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        self.location()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location().display())
    }
}

/// Check that `base` can serve as a base directory and return its canonical
/// location.
fn validate_base_dir(base: &Path) -> Result<PathBuf> {
    if !base.is_absolute() {
        return Err(Error::invalid_base(base, "should be absolute"));
    }
    if base.exists() && !base.is_dir() {
        return Err(Error::invalid_base(
            base,
            "exists and is not a directory",
        ));
    }
    Ok(real_location(base))
}

/// Resolve symlinks in every existing prefix of `path` and normalize `.` and
/// `..` in the remainder.
///
/// Unlike `fs::canonicalize` this succeeds for paths that do not exist yet,
/// such as the output files of a first run.
pub fn real_location(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if let Ok(canonical) = dunce::canonicalize(&resolved) {
                    resolved = canonical;
                }
            }
        }
    }
    resolved
}

/// Lexical relative path from directory `base` to `target`.
///
/// Both inputs are expected to be canonical absolute paths.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();

    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component);
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("/a/b/c", "/a/b", "c")]
    #[case("/a/b/c", "/a/d", "../b/c")]
    #[case("/a/b", "/a/b", ".")]
    #[case("/a", "/a/b/c", "../..")]
    #[case("/x/y", "/a/b", "../../x/y")]
    fn relative_path_cases(#[case] target: &str, #[case] base: &str, #[case] expected: &str) {
        assert_eq!(
            relative_path(Path::new(target), Path::new(base)),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn real_location_normalizes_missing_tail() {
        let temp = TempDir::new().unwrap();
        let root = real_location(temp.path());
        let resolved = real_location(&temp.path().join("missing/./deeper/../file.txt"));
        assert_eq!(resolved, root.join("missing/file.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn real_location_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let root = real_location(temp.path());
        std::fs::create_dir(root.join("real")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        assert_eq!(real_location(&root.join("link/x.h")), root.join("real/x.h"));
    }

    #[test]
    fn resolve_classifies_domains() {
        let temp = TempDir::new().unwrap();
        let base = real_location(temp.path());
        let resolver = PathResolver::with_home_dir(base.join("home"));

        let user = resolver.resolve("~/libs/foo", None).unwrap();
        assert_eq!(user.domain(), PathDomain::UserRelative);
        assert_eq!(user.location(), base.join("home/libs/foo"));
        assert_eq!(user.relative_string().unwrap(), "libs/foo");

        let absolute = resolver.resolve("/usr/share", Some(&base)).unwrap();
        assert_eq!(absolute.domain(), PathDomain::Absolute);
        assert!(absolute.relative_string().is_err());

        let relative = resolver.resolve("src/main.cpp", Some(&base)).unwrap();
        assert_eq!(relative.domain(), PathDomain::BaseRelative);
        assert_eq!(relative.location(), base.join("src/main.cpp"));
        assert_eq!(relative.relative_string().unwrap(), "src/main.cpp");
    }

    #[test]
    fn resolve_rejects_invalid_base() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let resolver = PathResolver::new();

        assert!(matches!(
            resolver.resolve("a", None),
            Err(Error::InvalidBaseDirectory { .. })
        ));
        assert!(matches!(
            resolver.resolve("a", Some(Path::new("relative/base"))),
            Err(Error::InvalidBaseDirectory { .. })
        ));
        assert!(matches!(
            resolver.resolve("a", Some(&file)),
            Err(Error::InvalidBaseDirectory { .. })
        ));
        // A base that does not exist yet is fine.
        assert!(resolver.resolve("a", Some(&temp.path().join("later"))).is_ok());
    }

    #[test]
    fn with_suffix_keeps_domain() {
        let temp = TempDir::new().unwrap();
        let base = real_location(temp.path());
        let resolver = PathResolver::new();
        let sketch = resolver.resolve("proj/sketch.ino", Some(&base)).unwrap();

        let bin = sketch.with_suffix(".ino.bin");
        assert_eq!(bin.file_name(), Some("sketch.ino.bin"));
        assert_eq!(bin.domain(), PathDomain::BaseRelative);

        let bare = sketch.with_suffix("");
        assert_eq!(bare.relative_string().unwrap(), "proj/sketch");
    }

    #[test]
    fn equality_ignores_domain() {
        let temp = TempDir::new().unwrap();
        let base = real_location(temp.path());
        let resolver = PathResolver::new();

        let relative = resolver.resolve("a/b", Some(&base)).unwrap();
        let absolute = resolver
            .resolve(base.join("a/b").to_str().unwrap(), None)
            .unwrap();
        assert_eq!(relative, absolute);
    }
}
