use regex::RegexSet;
use std::path::Path;

pub fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

pub fn is_excluded(p: &Path, patterns: &RegexSet) -> bool {
    let s = normalize_separators(&p.to_string_lossy());
    patterns.is_match(&s)
}

pub fn has_extension(p: &Path, extensions: &[String]) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|want| want.trim_start_matches('.') == e))
        .unwrap_or(false)
}

pub fn normalize_separators(s: &str) -> String {
    s.replace('\\', "/")
}

/// Path of `file` relative to `root` with forward slashes, falling back to the
/// full path when no relative form exists.
pub fn display_path(root: &Path, file: &Path) -> String {
    let rel = pathdiff::diff_paths(file, root)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| file.to_path_buf());
    normalize_separators(&rel.to_string_lossy())
}
