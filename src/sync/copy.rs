//! # Tree Copying
//!
//! Two copy modes feed a destination folder from a clone:
//!
//! - **docs**: the `docs/` subfolder is copied verbatim, byte for byte.
//! - **root**: the whole clone is walked, `.git` metadata is skipped, and
//!   only files with an allowed extension (Markdown variants plus common
//!   image/PDF formats) are copied; files matching an exclude glob are
//!   skipped even when their extension is allowed.

use std::fs;
use std::path::Path;

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extensions (lowercase, no dot) allowed through a root-strategy copy.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "md", "mdx", "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "pdf",
];

/// Copy a subtree verbatim, with no filtering.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("walking {}: {}", src.display(), e),
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Path {
                message: format!("{}: {}", entry.path().display(), e),
            })?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy a subtree keeping only allowed file types, skipping `.git`
/// directories and anything matching one of `exclude`.
///
/// Exclude patterns are matched against the slash-separated path relative
/// to `src`.
pub fn copy_tree_filtered(src: &Path, dest: &Path, exclude: &[Pattern]) -> Result<()> {
    let walker = WalkDir::new(src)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == ".git"));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("walking {}: {}", src.display(), e),
        })?;
        if !entry.file_type().is_file() || !is_allowed(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Path {
                message: format!("{}: {}", entry.path().display(), e),
            })?;
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if exclude.iter().any(|p| p.matches(&relative_str)) {
            continue;
        }

        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
    }
    Ok(())
}

/// Compile exclude glob patterns once per source.
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Error::Glob))
        .collect()
}

fn is_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}
