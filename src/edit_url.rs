//! # Edit-URL Resolution
//!
//! Computes the "edit this page" link for any document of the site, at
//! build time, from static configuration plus the marker files the
//! synchronizer left behind. Pure with respect to its inputs and the
//! on-disk markers: no network access, no mutation.
//!
//! Two resolver shapes cover the site's collections:
//!
//! - [`EditUrlResolver`] — the whole collection maps to one repository;
//!   the document path is prefixed (usually with `docs/`) unless an
//!   override substitutes a different path or a complete URL.
//! - [`CollectionResolver`] — the collection aggregates many small
//!   repositories; the first path segment selects the upstream repository
//!   via the marker-derived map (or a static entry), and a key with no
//!   mapping falls back to a link into the docs-site repository itself, so
//!   no broken link is ever produced.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::{CollectionMode, CollectionSpec, SiteConfig};
use crate::error::{Error, Result};
use crate::markers::{self, SyncedRepo};
use crate::path::{ensure_trailing_slash, find_existing_file, split_key, trim_slashes};

/// A document identifier as presented by the site generator: either the
/// logical path itself, or a structured payload the path is derived from.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocRef {
    Path(String),
    Payload {
        #[serde(default, rename = "docPath")]
        doc_path: Option<String>,
        /// Source file reference like `@site/docs-core/how-to/use.md`.
        #[serde(default)]
        source: Option<String>,
    },
}

impl DocRef {
    pub fn path(path: impl Into<String>) -> Self {
        DocRef::Path(path.into())
    }
}

/// Derive the logical document path from a [`DocRef`].
///
/// A structured payload prefers its explicit path field; otherwise the
/// path is extracted from the source reference by stripping the
/// `@site/<collection-dir>/` prefix. Anything else is a configuration or
/// integration bug and must abort the build for that document.
pub fn normalize_doc_path(doc: &DocRef) -> Result<String> {
    match doc {
        DocRef::Path(path) => Ok(path.clone()),
        DocRef::Payload { doc_path, source } => {
            if let Some(path) = doc_path {
                return Ok(path.clone());
            }
            if let Some(source) = source {
                static SOURCE_RE: OnceLock<Regex> = OnceLock::new();
                let re = SOURCE_RE.get_or_init(|| {
                    Regex::new(r"@site/[^/]+/(.*)$").expect("static pattern is valid")
                });
                if let Some(captures) = re.captures(source) {
                    return Ok(captures[1].to_string());
                }
            }
            Err(Error::UnresolvableDocPath {
                payload: format!("docPath={:?}, source={:?}", doc_path, source),
            })
        }
    }
}

/// Resolver for a collection backed by a single fixed repository.
#[derive(Debug, Clone)]
pub struct EditUrlResolver {
    repo: String,
    branch: String,
    /// Normalized to end in `/`, or empty for root-copied content.
    prefix: String,
    overrides: BTreeMap<String, String>,
}

impl EditUrlResolver {
    pub fn new(
        repo: impl Into<String>,
        branch: impl Into<String>,
        path_prefix: Option<&str>,
        overrides: BTreeMap<String, String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            branch: branch.into(),
            prefix: path_prefix.map(ensure_trailing_slash).unwrap_or_default(),
            overrides,
        }
    }

    pub fn resolve(&self, doc: &DocRef) -> Result<String> {
        let doc_path = normalize_doc_path(doc)?;
        if let Some(mapped) = self.overrides.get(&doc_path) {
            // An override may replace the path or the whole URL (e.g. a
            // community forum thread for a doc that left the repository).
            if mapped.starts_with("https://") || mapped.starts_with("http://") {
                return Ok(mapped.clone());
            }
            return Ok(self.edit_link(mapped));
        }
        Ok(self.edit_link(&format!("{}{}", self.prefix, doc_path)))
    }

    fn edit_link(&self, repo_path: &str) -> String {
        format!(
            "https://github.com/{}/edit/{}/{}",
            self.repo, self.branch, repo_path
        )
    }
}

/// Resolver for a collection aggregating many upstream repositories keyed
/// by their top-level folder.
#[derive(Debug, Clone)]
pub struct CollectionResolver {
    branch: String,
    /// The docs-site repository, used for same-repository fallback links.
    site_repo: String,
    /// Collection folder inside the docs-site repository.
    content_dir: String,
    repos: BTreeMap<String, SyncedRepo>,
}

impl CollectionResolver {
    pub fn new(
        branch: impl Into<String>,
        site_repo: impl Into<String>,
        content_dir: impl Into<String>,
        repos: BTreeMap<String, SyncedRepo>,
    ) -> Self {
        Self {
            branch: branch.into(),
            site_repo: site_repo.into(),
            content_dir: content_dir.into(),
            repos,
        }
    }

    pub fn resolve(&self, doc: &DocRef) -> Result<String> {
        let doc_path = normalize_doc_path(doc)?;
        let (key, rest) = split_key(&doc_path);
        let entry = match self.repos.get(key) {
            Some(entry) => entry,
            // Unregistered key: link into the docs-site repository so the
            // page still gets a working edit link.
            None => {
                return Ok(format!(
                    "https://github.com/{}/edit/{}/{}/{}",
                    self.site_repo, self.branch, self.content_dir, doc_path
                ));
            }
        };

        let prefix = if entry.edit_base != "root" {
            ensure_trailing_slash(&entry.edit_base)
        } else {
            String::new()
        };
        let repo_relative = if !rest.is_empty() && !prefix.is_empty() && !rest.starts_with(&prefix)
        {
            format!("{}{}", prefix, rest)
        } else {
            rest.to_string()
        };

        if !repo_relative.is_empty() {
            return Ok(format!(
                "https://github.com/{}/edit/{}/{}",
                entry.repo,
                self.branch,
                repo_relative.trim_start_matches('/')
            ));
        }

        // The key itself (a folder) has no file path to edit; link to the
        // tree instead.
        let tree_path = if entry.edit_base != "root" {
            trim_slashes(&entry.edit_base)
        } else {
            ""
        };
        if tree_path.is_empty() {
            Ok(format!(
                "https://github.com/{}/tree/{}",
                entry.repo, self.branch
            ))
        } else {
            Ok(format!(
                "https://github.com/{}/tree/{}/{}",
                entry.repo, self.branch, tree_path
            ))
        }
    }
}

/// A resolver for one collection, in either shape.
#[derive(Debug, Clone)]
pub enum Resolver {
    Single(EditUrlResolver),
    Collection(CollectionResolver),
}

impl Resolver {
    pub fn resolve(&self, doc: &DocRef) -> Result<String> {
        match self {
            Resolver::Single(resolver) => resolver.resolve(doc),
            Resolver::Collection(resolver) => resolver.resolve(doc),
        }
    }
}

/// Build the resolver for one collection of `site`, reading marker files
/// and probing override candidates under `site_dir`.
pub fn resolver_for(site: &SiteConfig, collection: &CollectionSpec, site_dir: &Path) -> Result<Resolver> {
    let content_root = site_dir.join(&collection.content_dir);
    match &collection.mode {
        CollectionMode::Single {
            repo,
            path_prefix,
            overrides,
            probed_overrides,
        } => {
            let mut overrides = overrides.clone();
            for probe in probed_overrides {
                let candidates: Vec<&str> =
                    probe.candidates.iter().map(String::as_str).collect();
                let resolved = find_existing_file(&content_root, &candidates)
                    .unwrap_or_else(|| probe.fallback.clone());
                overrides.insert(probe.doc_path.clone(), resolved);
            }
            Ok(Resolver::Single(EditUrlResolver::new(
                repo.clone(),
                site.branch.clone(),
                path_prefix.as_deref(),
                overrides,
            )))
        }
        CollectionMode::PerKey { static_repos } => {
            // Markers win over static entries: they record what the last
            // sync actually did.
            let mut repos = static_repos.clone();
            repos.extend(markers::load_all(&content_root)?);
            Ok(Resolver::Collection(CollectionResolver::new(
                site.branch.clone(),
                site.site_repo.clone(),
                collection.content_dir.clone(),
                repos,
            )))
        }
    }
}
