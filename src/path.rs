//! Path manipulation utilities for docsite

use std::path::Path;

/// Return the first candidate (slash-normalized) that exists under `base`.
///
/// Candidates are relative paths tried in order; the probe is used both for
/// shim targets and for the install-guide override, so the returned path is
/// always forward-slash separated regardless of platform.
pub fn find_existing_file(base: &Path, candidates: &[&str]) -> Option<String> {
    for candidate in candidates {
        if base.join(candidate).exists() {
            return Some(candidate.replace('\\', "/"));
        }
    }
    None
}

/// Normalize a repository path prefix to end in exactly one slash.
///
/// An empty prefix stays empty: content copied from a repository root has
/// no prefix at all.
pub fn ensure_trailing_slash(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{}/", prefix.trim_end_matches('/'))
    }
}

/// Strip leading and trailing slashes from a path fragment.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Split a logical document path into its first segment and the remainder.
///
/// `"ai-chat/getting-started.md"` becomes `("ai-chat", "getting-started.md")`;
/// a single-segment path has an empty remainder.
pub fn split_key(doc_path: &str) -> (&str, &str) {
    match doc_path.split_once('/') {
        Some((key, rest)) => (key, rest),
        None => (doc_path, ""),
    }
}
