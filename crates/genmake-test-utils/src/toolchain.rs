//! Stand-in `make` programs that succeed with canned output or fail.
//!
//! The generator runs `make -C <dir> -f <Makefile> <rule>` to harvest
//! preprocessor definitions from a verbose build. These fixtures replace the
//! real toolchain with small shell scripts so tests do not need `arduino-cli`.

use std::fs;
use std::path::{Path, PathBuf};

/// A shell script posing as `make`, recording every invocation.
pub struct FakeMake {
    /// Path of the executable script.
    pub program: PathBuf,
    log: PathBuf,
}

impl FakeMake {
    /// A `make` that succeeds for every rule and prints `build_output` for the
    /// `build` rule.
    ///
    /// Realism level: **FAKE**, exit status and stdout only.
    pub fn succeeding(dir: &Path, build_output: &str) -> Self {
        let body = format!(
            "if [ \"$rule\" = \"build\" ]; then\ncat <<'GENMAKE_EOF'\n{build_output}\nGENMAKE_EOF\nfi\nexit 0\n"
        );
        Self::write(dir, "fake-make", &body)
    }

    /// A `make` that fails every rule, printing `stderr` to standard error.
    ///
    /// Realism level: **FAKE**, a broken toolchain.
    pub fn failing(dir: &Path, stderr: &str) -> Self {
        let body = format!("cat >&2 <<'GENMAKE_EOF'\n{stderr}\nGENMAKE_EOF\nexit 2\n");
        Self::write(dir, "failing-make", &body)
    }

    fn write(dir: &Path, name: &str, body: &str) -> Self {
        fs::create_dir_all(dir).unwrap();
        let program = dir.join(name);
        let log = dir.join(format!("{name}.log"));
        let script = format!(
            "#!/bin/sh\nfor rule in \"$@\"; do :; done\necho \"$rule\" >> '{}'\n{body}",
            log.display()
        );
        fs::write(&program, script)
            .unwrap_or_else(|e| panic!("FakeMake: failed to write {}: {e}", program.display()));
        make_executable(&program);
        Self { program, log }
    }

    /// Rules this program was invoked with, in order.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .unwrap_or_else(|e| panic!("FakeMake: failed to chmod {}: {e}", path.display()));
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
