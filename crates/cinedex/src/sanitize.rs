//! Helpers for turning movie titles into safe path components and for
//! keeping full cache paths out of log lines.

use std::path::Path;

/// Characters that are invalid in file names on at least one supported
/// platform.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum length, in characters, of a sanitized name.
pub const MAX_NAME_LEN: usize = 100;

/// Makes `name` usable as a single path component.
///
/// Each of `<>:"/\|?*` becomes `_`, the result is cut to 100 characters and
/// surrounding whitespace is trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_NAME_LEN)
        .collect();
    replaced.trim().to_string()
}

/// The `"name (year)"` label used for per-movie file and directory names.
pub fn movie_label(name: &str, year: i32) -> String {
    sanitize_filename(&format!("{} ({})", name, year))
}

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
