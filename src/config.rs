//! # Source and Site Configuration
//!
//! Defines the two configuration structures the toolkit runs on:
//!
//! - **`SourceSpec`**: one upstream repository to synchronize — where it
//!   lives, which content folder it populates, which copy strategies to
//!   try, and the auxiliary imports, asset copies, and shim documents that
//!   belong to it. The built-in list ([`default_sources`]) mirrors the
//!   BrainDrive documentation sources; `--manifest` swaps in a YAML list
//!   with the same shape.
//!
//! - **`SiteConfig`**: the content collections of the published site and
//!   how each one maps documents back to an upstream repository for "edit
//!   this page" links. Collections either pin a single repository
//!   (`core`, `template`) or aggregate many small ones keyed by their
//!   top-level folder (`plugins`, `services`).
//!
//! Invariants are enforced up front by [`validate_sources`]: keys are
//! unique and destination folders never overlap, so no two sources can
//! clobber each other's trees.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markers::SyncedRepo;

/// Environment variable consulted for an access token to authenticate
/// clone URLs against private or rate-limited repositories.
pub const TOKEN_ENV: &str = "GH_TOKEN";

/// How a source's documentation tree is copied out of its clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyStrategy {
    /// Copy the `docs/` subfolder verbatim.
    Docs,
    /// Copy from the repository root, filtered to allowed file types.
    Root,
}

impl fmt::Display for CopyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStrategy::Docs => write!(f, "docs"),
            CopyStrategy::Root => write!(f, "root"),
        }
    }
}

/// A root-level document pulled into the docs tree alongside the main copy.
///
/// The first existing candidate (relative to the clone root) is copied to
/// `target` (relative to the destination). A missing required import is a
/// warning, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootDocImport {
    pub sources: Vec<String>,
    pub target: String,
    #[serde(default)]
    pub optional: bool,
}

/// An auxiliary subtree (e.g. an `images/` folder) filtered-copied into the
/// destination after sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraCopy {
    pub src: String,
    pub dest: String,
}

/// A synthesized document regenerated on every sync run.
///
/// Hand edits to shim files are silently overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShimSpec {
    /// Path of the shim, relative to the destination root.
    pub path: String,
    pub body: ShimBody,
}

/// The body of a shim document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ShimBody {
    /// Fixed content written as-is.
    Literal { content: String },
    /// An MDX page that imports the first candidate found inside the synced
    /// destination; falls back to a note pointing at the upstream
    /// repository when no candidate exists.
    Import {
        title: String,
        component: String,
        candidates: Vec<String>,
    },
    /// A sidebar category descriptor rendered as `_category_.json`.
    Category { label: String, position: u32 },
}

/// One upstream documentation source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    /// Short identifier, unique within the list.
    pub key: String,
    /// Upstream repository as `owner/name`.
    pub repo: String,
    /// Content folder this source populates, relative to the site root.
    pub dest: String,
    /// Copy strategies to try, in order.
    #[serde(default = "default_prefer")]
    pub prefer: Vec<CopyStrategy>,
    /// When true, clone failures and missing docs skip the source instead
    /// of aborting the run.
    #[serde(default)]
    pub optional: bool,
    /// Synthesize a landing document when none exists after copy.
    #[serde(default = "default_true")]
    pub ensure_landing_page: bool,
    /// Glob patterns (relative to the clone root) excluded from root-strategy
    /// copies even when their extension is allowed.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub root_doc_imports: Vec<RootDocImport>,
    #[serde(default)]
    pub extra_copies: Vec<ExtraCopy>,
    #[serde(default)]
    pub shims: Vec<ShimSpec>,
}

fn default_prefer() -> Vec<CopyStrategy> {
    vec![CopyStrategy::Docs, CopyStrategy::Root]
}

fn default_true() -> bool {
    true
}

impl SourceSpec {
    fn new(key: &str, repo: &str, dest: &str) -> Self {
        Self {
            key: key.to_string(),
            repo: repo.to_string(),
            dest: dest.to_string(),
            prefer: default_prefer(),
            optional: false,
            ensure_landing_page: true,
            exclude: Vec::new(),
            root_doc_imports: Vec::new(),
            extra_copies: Vec::new(),
            shims: Vec::new(),
        }
    }
}

/// Validate the source-list invariants: unique keys, non-overlapping
/// destination folders.
pub fn validate_sources(specs: &[SourceSpec]) -> Result<()> {
    let mut keys = BTreeSet::new();
    for spec in specs {
        if !keys.insert(spec.key.as_str()) {
            return Err(Error::Config {
                message: format!("duplicate source key '{}'", spec.key),
                hint: Some("source keys must be unique within the list".to_string()),
            });
        }
    }

    for (i, a) in specs.iter().enumerate() {
        for b in specs.iter().skip(i + 1) {
            if dests_overlap(&a.dest, &b.dest) {
                return Err(Error::Config {
                    message: format!(
                        "destinations overlap for '{}' ({}) and '{}' ({})",
                        a.key, a.dest, b.key, b.dest
                    ),
                    hint: Some(
                        "each source must own a distinct destination folder".to_string(),
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Destinations overlap when equal, or when one is a path-segment prefix of
/// the other (so a sync of one would clear or write inside the other).
fn dests_overlap(a: &str, b: &str) -> bool {
    let a = a.trim_matches('/');
    let b = b.trim_matches('/');
    if a == b {
        return true;
    }
    let (shorter, longer) = if a.len() < b.len() { (a, b) } else { (b, a) };
    longer.strip_prefix(shorter).is_some_and(|rest| rest.starts_with('/'))
}

/// Load a source list from a YAML manifest.
pub fn sources_from_file(path: &Path) -> Result<Vec<SourceSpec>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("cannot read manifest {}: {}", path.display(), e),
        hint: None,
    })?;
    let specs: Vec<SourceSpec> = serde_yaml::from_str(&content).map_err(|e| Error::Config {
        message: format!("invalid manifest {}: {}", path.display(), e),
        hint: Some("the manifest is a YAML list of source entries (key, repo, dest, ...)".to_string()),
    })?;
    validate_sources(&specs)?;
    Ok(specs)
}

/// The built-in BrainDrive source list.
pub fn default_sources() -> Vec<SourceSpec> {
    let mut core = SourceSpec::new(
        "core",
        "BrainDriveAI/BrainDrive-Core",
        "docs-core",
    );
    core.root_doc_imports = vec![
        RootDocImport {
            sources: vec![
                "CONTRIBUTING.mdx".into(),
                "CONTRIBUTING.md".into(),
                "docs/CONTRIBUTING.mdx".into(),
                "docs/CONTRIBUTING.md".into(),
            ],
            target: "_includes/CONTRIBUTING.mdx".into(),
            optional: false,
        },
        RootDocImport {
            sources: vec![
                "ROADMAP.mdx".into(),
                "ROADMAP.md".into(),
                "docs/ROADMAP.mdx".into(),
                "docs/ROADMAP.md".into(),
            ],
            target: "_includes/ROADMAP.mdx".into(),
            optional: false,
        },
    ];
    core.extra_copies = vec![ExtraCopy {
        src: "images".into(),
        dest: "images".into(),
    }];
    core.shims = vec![
        ShimSpec {
            path: "INSTALL.mdx".into(),
            body: ShimBody::Import {
                title: "Install BrainDrive-Core".into(),
                component: "InstallDoc".into(),
                candidates: vec![
                    "getting-started/install.md".into(),
                    "getting-started/install.mdx".into(),
                    "docs/getting-started/install.md".into(),
                    "docs/getting-started/install.mdx".into(),
                ],
            },
        },
        ShimSpec {
            path: "CONTRIBUTING.mdx".into(),
            body: ShimBody::Literal {
                content: "---\ntitle: Contributing to BrainDrive\n---\n\n\
                          import ContributingDoc from './_includes/CONTRIBUTING.mdx';\n\n\
                          <ContributingDoc />\n"
                    .into(),
            },
        },
        ShimSpec {
            path: "ROADMAP.mdx".into(),
            body: ShimBody::Literal {
                content: "---\ntitle: BrainDrive Roadmap\n---\n\n\
                          import RoadmapDoc from './_includes/ROADMAP.mdx';\n\n\
                          <RoadmapDoc />\n"
                    .into(),
            },
        },
    ];

    let mut template = SourceSpec::new(
        "template",
        "BrainDriveAI/PluginTemplate",
        "docs-template",
    );
    // Internal planning and development notes stay upstream; links to them
    // are rewritten to GitHub by the sanitizer.
    template.exclude = vec![
        "Plugin-Template-Plan.md".into(),
        "DEVELOPMENT.md".into(),
    ];

    let plugin = |key: &str, repo: &str, dest: &str, label: &str, position: u32| {
        let mut spec = SourceSpec::new(key, repo, dest);
        spec.shims = vec![ShimSpec {
            path: "_category_.json".into(),
            body: ShimBody::Category {
                label: label.into(),
                position,
            },
        }];
        spec
    };

    let mut ai_chat = SourceSpec::new(
        "ai-chat",
        "DJJones66/BrainDriveChat",
        "docs-plugins/ai-chat",
    );
    ai_chat.optional = true;

    vec![
        core,
        template,
        plugin(
            "chat-plugin",
            "BrainDriveAI/BrainDrive-Chat-Plugin",
            "docs-plugins/brain-drive-chat-plugin",
            "BrainDrive-Chat-Plugin",
            3,
        ),
        plugin(
            "chat-with-docs-plugin",
            "BrainDriveAI/BrainDrive-Chat-With-Docs-Plugin",
            "docs-plugins/brain-drive-chat-with-docs-plugin",
            "BrainDrive-Chat-With-Docs-Plugin",
            6,
        ),
        plugin(
            "settings-plugin",
            "BrainDriveAI/BrainDrive-Settings-Plugin",
            "docs-plugins/brain-drive-settings-plugin",
            "BrainDrive-Settings-Plugin",
            2,
        ),
        plugin(
            "ollama-plugin",
            "BrainDriveAI/BrainDrive-Ollama-Plugin",
            "docs-plugins/brain-drive-ollama-plugin",
            "BrainDrive-Ollama-Plugin",
            4,
        ),
        plugin(
            "openrouter-plugin",
            "BrainDriveAI/BrainDrive-Openrouter-Plugin",
            "docs-plugins/brain-drive-openrouter-plugin",
            "BrainDrive-OpenRouter-Plugin",
            5,
        ),
        ai_chat,
    ]
}

/// An override whose replacement path is discovered by probing the synced
/// content tree at resolver-construction time.
#[derive(Debug, Clone)]
pub struct ProbedOverride {
    pub doc_path: String,
    pub candidates: Vec<String>,
    /// Used when none of the candidates exist on disk.
    pub fallback: String,
}

/// How one content collection maps documents to upstream repositories.
#[derive(Debug, Clone)]
pub enum CollectionMode {
    /// The whole collection comes from one fixed repository.
    Single {
        repo: String,
        /// Repository-relative prefix prepended to document paths
        /// (typically `docs`); empty when content came from the root.
        path_prefix: Option<String>,
        overrides: BTreeMap<String, String>,
        probed_overrides: Vec<ProbedOverride>,
    },
    /// Each top-level folder is an independent upstream repository,
    /// discovered from marker files with a static map as fallback.
    PerKey {
        static_repos: BTreeMap<String, SyncedRepo>,
    },
}

/// One content collection of the published site.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub id: String,
    /// Content folder relative to the site root.
    pub content_dir: String,
    pub mode: CollectionMode,
}

/// Site-level resolver configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// The docs-site repository itself, target of same-repository fallback
    /// links.
    pub site_repo: String,
    pub branch: String,
    pub collections: Vec<CollectionSpec>,
}

impl SiteConfig {
    pub fn collection(&self, id: &str) -> Result<&CollectionSpec> {
        self.collections
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::UnknownCollection {
                collection: id.to_string(),
            })
    }
}

/// The built-in site layout: four content collections mirroring the
/// published docs site.
pub fn default_site() -> SiteConfig {
    let mut core_overrides = BTreeMap::new();
    core_overrides.insert("ROADMAP.mdx".to_string(), "ROADMAP.md".to_string());
    core_overrides.insert("CONTRIBUTING.mdx".to_string(), "CONTRIBUTING.md".to_string());

    SiteConfig {
        site_repo: "BrainDriveAI/BrainDrive-Docs-Site".to_string(),
        branch: "main".to_string(),
        collections: vec![
            CollectionSpec {
                id: "core".to_string(),
                content_dir: "docs-core".to_string(),
                mode: CollectionMode::Single {
                    repo: "BrainDriveAI/BrainDrive-Core".to_string(),
                    path_prefix: Some("docs".to_string()),
                    overrides: core_overrides,
                    probed_overrides: vec![ProbedOverride {
                        // The local INSTALL.mdx shim proxies to the install
                        // guide inside the core repository.
                        doc_path: "INSTALL.mdx".to_string(),
                        candidates: vec![
                            "getting-started/install.md".to_string(),
                            "getting-started/install.mdx".to_string(),
                            "docs/getting-started/install.md".to_string(),
                            "docs/getting-started/install.mdx".to_string(),
                        ],
                        fallback: "getting-started/install.md".to_string(),
                    }],
                },
            },
            CollectionSpec {
                id: "template".to_string(),
                content_dir: "docs-template".to_string(),
                mode: CollectionMode::Single {
                    repo: "BrainDriveAI/PluginTemplate".to_string(),
                    path_prefix: Some("docs".to_string()),
                    overrides: BTreeMap::new(),
                    probed_overrides: Vec::new(),
                },
            },
            CollectionSpec {
                id: "services".to_string(),
                content_dir: "docs-services".to_string(),
                mode: CollectionMode::PerKey {
                    static_repos: BTreeMap::new(),
                },
            },
            CollectionSpec {
                id: "plugins".to_string(),
                content_dir: "docs-plugins".to_string(),
                mode: CollectionMode::PerKey {
                    static_repos: BTreeMap::new(),
                },
            },
        ],
    }
}
