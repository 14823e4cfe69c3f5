//! Harvesting preprocessor definitions from a verbose build
//!
//! The toolchain knows which `-D` flags a board needs; the only reliable way
//! to learn them is to run the build and read the compiler command lines.

use std::sync::LazyLock;

use genmake_fs::ProjectPath;
use regex::Regex;

use super::BuildRunner;
use crate::Result;

/// Rules run, in order, to harvest definitions. The output of `build` is
/// parsed; the `clean` runs leave the tree as it was found.
const HARVEST_RULES: [&str; 3] = ["clean", "build", "clean"];

/// Stands in for `\"` while quoted strings are matched.
const ESCAPED_QUOTE: &str = "\u{1}";

/// Commands run by `arduino-cli` itself, rather than the compiler.
const DRIVER_SUFFIX: &str = "arduino-cli";

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// Run a full build through `makefile` and return the `-D` flags it used.
pub fn harvest_defines(runner: &dyn BuildRunner, makefile: &ProjectPath) -> Result<Vec<String>> {
    let mut build_output = String::new();
    for rule in HARVEST_RULES {
        let output = runner.run_rule(makefile, rule)?;
        if rule == "build" {
            build_output = output;
        }
    }
    let defines = parse_defines(&build_output);
    tracing::debug!(count = defines.len(), "Harvested preprocessor definitions");
    Ok(defines)
}

/// Extract unique `-D` flags from build output, in first-seen order.
///
/// Backslash-continued lines are joined into one command. Commands run by
/// the `arduino-cli` driver are skipped. Flags are found both inside double
/// quotes (where they may contain escaped quotes and spaces) and as plain
/// words; surrounding quotes are removed so both spellings deduplicate.
///
/// # Example
///
/// ```
/// use genmake_core::descriptor::parse_defines;
///
/// let output = r#"avr-g++ -c -DF_CPU=16000000L "-DARDUINO_BOARD=\"AVR_UNO\"" main.cpp"#;
/// assert_eq!(
///     parse_defines(output),
///     vec![r#"-DARDUINO_BOARD=\"AVR_UNO\""#, "-DF_CPU=16000000L"]
/// );
/// ```
pub fn parse_defines(output: &str) -> Vec<String> {
    let mut defines: Vec<String> = Vec::new();
    let mut push = |define: String| {
        if !defines.contains(&define) {
            defines.push(define);
        }
    };

    for command in join_continuations(output) {
        let Some(program) = command.split_whitespace().next() else {
            continue;
        };
        if program.ends_with(DRIVER_SUFFIX) {
            continue;
        }

        let masked = command.replace("\\\"", ESCAPED_QUOTE);
        for captures in QUOTED.captures_iter(&masked) {
            let quoted = &captures[1];
            if quoted.starts_with("-D") {
                push(quoted.replace(ESCAPED_QUOTE, "\\\""));
            }
        }
        for word in masked.split_whitespace() {
            if word.contains(ESCAPED_QUOTE) {
                continue;
            }
            if let Some(define) = unquoted_define(word) {
                push(define.to_string());
            }
        }
    }
    defines
}

/// `-DX`, `"-DX"` or `'-DX'`; half-quoted words belong to a longer quoted
/// string and are skipped.
fn unquoted_define(word: &str) -> Option<&str> {
    if word.starts_with("-D") {
        return Some(word);
    }
    for quote in ['"', '\''] {
        if let Some(inner) = word
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.starts_with("-D").then_some(inner);
        }
    }
    None
}

fn join_continuations(output: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut current = String::new();
    for line in output.lines() {
        current.push_str(line);
        if current.ends_with('\\') {
            current.pop();
            continue;
        }
        commands.push(std::mem::take(&mut current));
    }
    if !current.is_empty() {
        commands.push(current);
    }
    commands
}

/// Convert a `-D` flag to a qmake `DEFINES` entry.
///
/// ```
/// use genmake_core::descriptor::qmake_define;
///
/// assert_eq!(qmake_define("-DF_CPU=16000000L"), "F_CPU=16000000L");
/// assert_eq!(qmake_define(r#"-DBOARD=\"UNO\""#), r#"BOARD=\\\"UNO\\\""#);
/// ```
pub fn qmake_define(define: &str) -> String {
    define
        .strip_prefix("-D")
        .unwrap_or(define)
        .replace("\\\"", "\\\\\\\"")
}
