//! Constants shared by every generated artifact.

/// First line of every file this tool writes.
///
/// A pre-existing output is only deleted when it is empty or carries this
/// marker, so a hand-written file is never clobbered.
pub const GENERATED_MARKER: &str = "# Generated by arduino-genmakefile";

/// Prefix of an interpreter line, which may precede the marker in scripts.
pub const SHEBANG_PREFIX: &str = "#!";

/// Returns true if `head` starts with the generated-file marker.
///
/// `head` holds the leading bytes of a file, which need not be UTF-8. The
/// marker is accepted on the first line, or on the second line when the first
/// line is a shebang.
pub fn has_generated_marker(head: &[u8]) -> bool {
    let mut lines = head
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line));
    let marker = GENERATED_MARKER.as_bytes();
    match lines.next() {
        Some(first) if first == marker => true,
        Some(first) if first.starts_with(SHEBANG_PREFIX.as_bytes()) => lines.next() == Some(marker),
        _ => false,
    }
}
