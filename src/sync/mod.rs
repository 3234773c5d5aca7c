//! # Content Synchronization Pipeline
//!
//! Pulls each configured upstream repository into its local content folder.
//! Per source the pipeline is:
//!
//! 1.  **Clone**: shallow-clone into a scratch checkout under the cache
//!     directory, with the access token (if any) injected into the URL.
//! 2.  **Select & copy**: try the copy strategies in preference order —
//!     a `docs/` subfolder is copied verbatim, a repository root is copied
//!     with extension filtering. The destination is fully cleared first,
//!     so stale files from a previous run never linger.
//! 3.  **Mark**: record the chosen strategy and source repository in the
//!     destination's marker files.
//! 4.  **Import**: pull configured root documents (e.g. `ROADMAP.md`) into
//!     the tree from an ordered candidate list.
//! 5.  **Sanitize**: rewrite Markdown for the site's renderer.
//! 6.  **Extras, landing page, shims**: auxiliary asset subtrees, a
//!     synthesized `intro.md` when none exists, and the regenerated shim
//!     documents.
//!
//! Sources are independent (disjoint destinations, disjoint checkouts), so
//! they run in parallel via `rayon`; outcomes are collected in input
//! order. A clone failure or empty docs tree aborts the run unless the
//! source is `optional`; every per-document step inside a source degrades
//! to a logged warning.
//!
//! The run is not transactional: a fatal failure on one source leaves the
//! others already synced on disk, which is an accepted, recoverable state —
//! simply re-run.

pub mod copy;
pub mod sanitize;
pub mod shim;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use rayon::prelude::*;

use crate::config::{validate_sources, CopyStrategy, SourceSpec};
use crate::error::{Error, Result};
use crate::path::find_existing_file;
use crate::{git, markers};

/// Scratch location for clones, relative to the site directory.
pub const CACHE_SUBDIR: &str = ".cache/sources";

/// Options for one synchronization run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Site root; destinations are resolved against this.
    pub site_dir: PathBuf,
    /// Scratch directory for clones, recreated at the start of every run.
    pub cache_dir: PathBuf,
    /// Access token injected into clone URLs.
    pub token: Option<String>,
    pub clone_timeout: Duration,
}

impl SyncOptions {
    pub fn new(site_dir: impl Into<PathBuf>) -> Self {
        let site_dir = site_dir.into();
        let cache_dir = site_dir.join(CACHE_SUBDIR);
        Self {
            site_dir,
            cache_dir,
            token: None,
            clone_timeout: git::DEFAULT_CLONE_TIMEOUT,
        }
    }
}

/// Per-source result of a run.
#[derive(Debug, Clone)]
pub enum Outcome {
    Synced {
        key: String,
        repo: String,
        dest: String,
        strategy: CopyStrategy,
    },
    /// An optional source that failed to clone or had no docs.
    Skipped {
        key: String,
        repo: String,
        reason: String,
    },
}

/// Summary of a completed run, in input order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<Outcome>,
}

impl SyncReport {
    pub fn synced(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Synced { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Skipped { .. }))
    }
}

/// Synchronize all sources.
///
/// Validates the source-list invariants, recreates the scratch directory,
/// then processes every source. The first fatal per-source error (in input
/// order) aborts with that error; sources already processed stay on disk.
pub fn run(specs: &[SourceSpec], opts: &SyncOptions) -> Result<SyncReport> {
    validate_sources(specs)?;

    if opts.cache_dir.exists() {
        fs::remove_dir_all(&opts.cache_dir)?;
    }
    fs::create_dir_all(&opts.cache_dir)?;

    let results: Vec<Result<Outcome>> = specs
        .par_iter()
        .map(|spec| sync_source(spec, opts))
        .collect();

    let mut outcomes = Vec::with_capacity(results.len());
    for result in results {
        outcomes.push(result?);
    }
    Ok(SyncReport { outcomes })
}

fn sync_source(spec: &SourceSpec, opts: &SyncOptions) -> Result<Outcome> {
    let checkout = opts.cache_dir.join(&spec.key);

    if let Err(e) = git::clone_shallow(
        &spec.repo,
        opts.token.as_deref(),
        &checkout,
        opts.clone_timeout,
    ) {
        if spec.optional {
            warn!("skipping {} (clone failed): {}", spec.repo, e);
            return Ok(Outcome::Skipped {
                key: spec.key.clone(),
                repo: spec.repo.clone(),
                reason: "clone failed".to_string(),
            });
        }
        return Err(e);
    }

    match populate_from_checkout(spec, &checkout, &opts.site_dir)? {
        Some(strategy) => Ok(Outcome::Synced {
            key: spec.key.clone(),
            repo: spec.repo.clone(),
            dest: spec.dest.clone(),
            strategy,
        }),
        None if spec.optional => {
            warn!("skipping {} (no docs found)", spec.repo);
            Ok(Outcome::Skipped {
                key: spec.key.clone(),
                repo: spec.repo.clone(),
                reason: "no docs found".to_string(),
            })
        }
        None => Err(Error::NoDocsFound {
            repo: spec.repo.clone(),
        }),
    }
}

/// Run everything after the clone for one source: clear the destination,
/// copy with the first applicable strategy, write markers, import root
/// documents, sanitize, copy extras, ensure the landing page, and write
/// shims.
///
/// Returns the strategy used, or `None` when no strategy applied (the
/// caller decides whether that is fatal). Split out from [`run`] so the
/// whole per-source behavior is exercisable against a plain directory
/// instead of a git checkout.
pub fn populate_from_checkout(
    spec: &SourceSpec,
    checkout: &Path,
    site_dir: &Path,
) -> Result<Option<CopyStrategy>> {
    let dest = site_dir.join(&spec.dest);
    if dest.exists() {
        fs::remove_dir_all(&dest)?;
    }

    let strategy = match select_strategy(spec, checkout) {
        Some(strategy) => strategy,
        None => return Ok(None),
    };

    fs::create_dir_all(&dest)?;
    match strategy {
        CopyStrategy::Docs => copy::copy_tree(&checkout.join("docs"), &dest)?,
        CopyStrategy::Root => {
            let excludes = copy::compile_excludes(&spec.exclude)?;
            copy::copy_tree_filtered(checkout, &dest, &excludes)?;
        }
    }

    markers::write(&dest, &spec.repo, strategy)?;
    import_root_docs(spec, checkout, &dest)?;
    sanitize::sanitize_tree(&dest, &spec.repo)?;

    for extra in &spec.extra_copies {
        let extra_src = checkout.join(&extra.src);
        if extra_src.exists() {
            copy::copy_tree_filtered(&extra_src, &dest.join(&extra.dest), &[])?;
        }
    }

    if spec.ensure_landing_page {
        shim::ensure_landing_page(spec, &dest)?;
    }
    shim::write_shims(spec, &dest)?;

    debug!("synced {} -> {} [{}]", spec.repo, spec.dest, strategy);
    Ok(Some(strategy))
}

/// First applicable strategy in preference order. `docs` applies when the
/// clone has a `docs` directory; `root` always applies.
fn select_strategy(spec: &SourceSpec, checkout: &Path) -> Option<CopyStrategy> {
    spec.prefer.iter().copied().find(|strategy| match strategy {
        CopyStrategy::Docs => checkout.join("docs").is_dir(),
        CopyStrategy::Root => true,
    })
}

fn import_root_docs(spec: &SourceSpec, checkout: &Path, dest: &Path) -> Result<()> {
    for import in &spec.root_doc_imports {
        let candidates: Vec<&str> = import.sources.iter().map(String::as_str).collect();
        match find_existing_file(checkout, &candidates) {
            Some(rel) => {
                let to = dest.join(&import.target);
                if let Some(parent) = to.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(checkout.join(rel), to)?;
            }
            None => {
                if !import.optional {
                    warn!("no source found for {}:{}", spec.repo, import.target);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_sources;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Content snapshot of a tree, keyed by slash-separated relative path.
    fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut map = BTreeMap::new();
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry.unwrap();
            if entry.file_type().is_file() {
                let rel = entry
                    .path()
                    .strip_prefix(dir)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                map.insert(rel, fs::read(entry.path()).unwrap());
            }
        }
        map
    }

    fn spec(key: &str, dest: &str) -> SourceSpec {
        serde_yaml::from_str(&format!(
            "key: {key}\nrepo: example/{key}\ndest: {dest}\n"
        ))
        .unwrap()
    }

    #[test]
    fn test_docs_strategy_copies_subfolder_byte_identical() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("checkout");
        let site = temp.path().join("site");
        touch(&checkout.join("docs/intro.md"), "# Intro\n");
        touch(&checkout.join("docs/how-to/use.md"), "plain\n");
        touch(&checkout.join("README.md"), "root readme, not copied");

        let spec = spec("demo", "docs-demo");
        let used = populate_from_checkout(&spec, &checkout, &site).unwrap();
        assert_eq!(used, Some(CopyStrategy::Docs));

        let dest = site.join("docs-demo");
        let synced = markers::read(&dest).unwrap().unwrap();
        assert_eq!(synced.edit_base, "docs");
        assert_eq!(synced.repo, "example/demo");
        assert!(!dest.join("README.md").exists());

        // Destination matches the docs subfolder byte for byte (markers and
        // the synthesized landing page aside)
        let mut dest_snapshot = snapshot(&dest);
        dest_snapshot.remove(markers::EDIT_BASE_FILE);
        dest_snapshot.remove(markers::REPO_FILE);
        assert_eq!(dest_snapshot, snapshot(&checkout.join("docs")));
    }

    #[test]
    fn test_root_strategy_filters_extensions() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("checkout");
        let site = temp.path().join("site");
        touch(&checkout.join("README.md"), "# Readme\n");
        touch(&checkout.join("src/lib.rs"), "code");
        touch(&checkout.join(".git/HEAD"), "ref");

        let spec = spec("demo", "docs-demo");
        let used = populate_from_checkout(&spec, &checkout, &site).unwrap();
        assert_eq!(used, Some(CopyStrategy::Root));

        let dest = site.join("docs-demo");
        assert!(dest.join("README.md").exists());
        assert!(!dest.join("src").exists());
        assert!(!dest.join(".git").exists());
        assert_eq!(markers::read(&dest).unwrap().unwrap().edit_base, "root");
    }

    #[test]
    fn test_no_strategy_applies() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("checkout");
        let site = temp.path().join("site");
        touch(&checkout.join("README.md"), "# Readme\n");

        let mut spec = spec("demo", "docs-demo");
        spec.prefer = vec![CopyStrategy::Docs];
        let used = populate_from_checkout(&spec, &checkout, &site).unwrap();
        assert_eq!(used, None);
    }

    #[test]
    fn test_destination_fully_cleared() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("checkout");
        let site = temp.path().join("site");
        touch(&checkout.join("docs/intro.md"), "# Intro\n");
        touch(&site.join("docs-demo/stale.md"), "left over from last run");

        populate_from_checkout(&spec("demo", "docs-demo"), &checkout, &site).unwrap();

        assert!(!site.join("docs-demo/stale.md").exists());
        assert!(site.join("docs-demo/intro.md").exists());
    }

    #[test]
    fn test_populate_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("checkout");
        let site = temp.path().join("site");
        touch(&checkout.join("docs/guide.md"), "speed <100ms\n");
        touch(&checkout.join("ROADMAP.md"), "# Roadmap\n");

        let mut core = default_sources().into_iter().find(|s| s.key == "core").unwrap();
        core.repo = "example/demo".to_string();
        core.dest = "docs-demo".to_string();

        populate_from_checkout(&core, &checkout, &site).unwrap();
        let first = snapshot(&site.join("docs-demo"));
        populate_from_checkout(&core, &checkout, &site).unwrap();
        let second = snapshot(&site.join("docs-demo"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_pipeline_for_core_like_source() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("checkout");
        let site = temp.path().join("site");
        touch(
            &checkout.join("docs/getting-started/install.md"),
            "install in <5 minutes\n",
        );
        touch(&checkout.join("CONTRIBUTING.md"), "# Contributing\n");
        touch(&checkout.join("images/logo.png"), "png");
        touch(&checkout.join("images/notes.txt"), "skipped");

        let core = default_sources().into_iter().find(|s| s.key == "core").unwrap();
        let used = populate_from_checkout(&core, &checkout, &site).unwrap();
        assert_eq!(used, Some(CopyStrategy::Docs));

        let dest = site.join("docs-core");
        // Sanitized copy
        assert_eq!(
            fs::read_to_string(dest.join("getting-started/install.md")).unwrap(),
            "install in &lt;5 minutes\n"
        );
        // Root doc import (ROADMAP has no candidate; that is a warning only)
        assert!(dest.join("_includes/CONTRIBUTING.mdx").exists());
        assert!(!dest.join("_includes/ROADMAP.mdx").exists());
        // Extra asset copy is filtered
        assert!(dest.join("images/logo.png").exists());
        assert!(!dest.join("images/notes.txt").exists());
        // Landing page and shims
        assert!(dest.join("intro.md").exists());
        let install = fs::read_to_string(dest.join("INSTALL.mdx")).unwrap();
        assert!(install.contains("@site/docs-core/getting-started/install.md"));
        assert!(dest.join("ROADMAP.mdx").exists());
    }

    #[test]
    fn test_run_rejects_invalid_source_list() {
        let temp = TempDir::new().unwrap();
        let specs = vec![spec("a", "docs-x"), spec("a", "docs-y")];
        let opts = SyncOptions::new(temp.path());
        assert!(run(&specs, &opts).is_err());
    }
}
