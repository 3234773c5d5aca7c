//! # Copy Markers
//!
//! Two small plain-text files record, per synced destination, which copy
//! strategy was used (`.editbase`: `docs` or `root`) and which repository
//! the content came from (`.repo`: `owner/name`). They are overwritten by
//! every sync run and read later by the edit-URL resolver when a collection
//! has no static repository mapping.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::CopyStrategy;
use crate::error::Result;

/// File naming the copy strategy used for a destination.
pub const EDIT_BASE_FILE: &str = ".editbase";
/// File naming the source repository for a destination.
pub const REPO_FILE: &str = ".repo";

/// Marker metadata for one synced destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedRepo {
    /// Upstream repository as `owner/name`.
    pub repo: String,
    /// Repository-relative base the content was copied from: `docs` or
    /// `root` (slashes trimmed).
    pub edit_base: String,
}

/// Write the marker pair into a destination root.
pub fn write(dest: &Path, repo: &str, strategy: CopyStrategy) -> Result<()> {
    fs::write(dest.join(EDIT_BASE_FILE), strategy.to_string())?;
    fs::write(dest.join(REPO_FILE), repo)?;
    Ok(())
}

/// Read the marker pair from a destination root.
///
/// Returns `None` when no `.repo` marker exists (or it is empty) — the
/// destination was not populated by the synchronizer. A missing or empty
/// `.editbase` defaults to `root`.
pub fn read(dir: &Path) -> Result<Option<SyncedRepo>> {
    let repo_file = dir.join(REPO_FILE);
    if !repo_file.exists() {
        return Ok(None);
    }
    let repo = fs::read_to_string(&repo_file)?.trim().to_string();
    if repo.is_empty() {
        return Ok(None);
    }

    let mut edit_base = "root".to_string();
    let edit_base_file = dir.join(EDIT_BASE_FILE);
    if edit_base_file.exists() {
        let value = fs::read_to_string(&edit_base_file)?;
        let value = value.trim().trim_matches('/');
        if !value.is_empty() {
            edit_base = value.to_string();
        }
    }

    Ok(Some(SyncedRepo { repo, edit_base }))
}

/// Read markers for every immediate subdirectory of a collection root.
///
/// Entries that are not directories or carry no usable `.repo` marker are
/// skipped. A missing collection root yields an empty map.
pub fn load_all(base_dir: &Path) -> Result<BTreeMap<String, SyncedRepo>> {
    let mut result = BTreeMap::new();
    if !base_dir.exists() {
        return Ok(result);
    }

    for entry in fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if let Some(synced) = read(&path)? {
            result.insert(name, synced);
        }
    }

    Ok(result)
}
