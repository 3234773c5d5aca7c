//! # Markdown Sanitization
//!
//! Upstream repositories write their Markdown for GitHub's renderer; the
//! site's MDX pipeline is stricter. After every copy, each Markdown/MDX
//! file in the destination is rewritten line by line:
//!
//! - content inside fenced code blocks is never touched,
//! - inline code spans within a line are never touched,
//! - everything else runs through an ordered table of rewrite rules.
//!
//! The rule table is the contract with the upstream content: a general
//! tier (escaping bare `<`, stripping Kramdown-style attribute lists,
//! normalizing the community domain, dropping stale `docs/repos/<name>/`
//! prefixes) followed by per-repository substitutions that retarget links
//! to files that were renamed, moved, or intentionally left upstream.
//! Rules are order-sensitive within a line; later rules act on the output
//! of earlier ones.

use std::fs;
use std::path::Path;

use log::warn;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::Result;

/// Which repositories a rewrite rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Any,
    /// Bare repository name, e.g. `BrainDrive-Core`.
    Repo(&'static str),
}

struct RuleSpec {
    pattern: &'static str,
    replacement: &'static str,
    applies: Applies,
}

/// Rules applied to every source, in order.
const GENERAL_RULES: &[RuleSpec] = &[
    // Escape "<" that doesn't start a valid HTML/MDX tag (prose like <100ms)
    RuleSpec {
        pattern: r"<([^A-Za-z$_!/?])",
        replacement: "&lt;${1}",
        applies: Applies::Any,
    },
    // Attribute blocks after links/images: "](...){...}"
    RuleSpec {
        pattern: r"\)\{[^}]*\}",
        replacement: ")",
        applies: Applies::Any,
    },
    // Kramdown attribute lists: "{: ...}", "{#id}", "{.class}"
    RuleSpec {
        pattern: r"\{:[^}]*\}",
        replacement: "",
        applies: Applies::Any,
    },
    RuleSpec {
        pattern: r"\{[#.][^}]*\}",
        replacement: "",
        applies: Applies::Any,
    },
    // Remaining brace blocks that look like key=value attribute lists
    RuleSpec {
        pattern: r"\{[^{}\n]*=[^{}\n]*\}",
        replacement: "",
        applies: Applies::Any,
    },
    RuleSpec {
        pattern: r"(?i)\{[^{}\n]*(?:label|target|rel|role|data-[^=]*)[^{}\n]*\}",
        replacement: "",
        applies: Applies::Any,
    },
    // Normalize the bare community domain to a fully qualified link
    RuleSpec {
        pattern: r"(?i)\]\((?:https?://)?community\.braindrive\.ai",
        replacement: "](https://community.braindrive.ai",
        applies: Applies::Any,
    },
];

/// Per-repository substitutions, in order. `applies` is matched against the
/// bare repository name.
const REPO_RULES: &[RuleSpec] = &[
    // LICENSE and ../LICENSE -> link to GitHub blob
    RuleSpec {
        pattern: r"\]\((?:\.{1,2}/)?LICENSE\)",
        replacement: "](https://github.com/BrainDriveAI/BrainDrive-Core/blob/main/LICENSE)",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"\.\./\.\./images/",
        replacement: "../images/",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    // Renamed docs retargeted to their new site routes
    RuleSpec {
        pattern: r"(?i)https?://docs\.braindrive\.ai/core/OWNER_USER_GUIDE",
        replacement: "https://docs.braindrive.ai/core/concepts/plugins",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"(?i)/core/OWNER_USER_GUIDE",
        replacement: "/core/concepts/plugins",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"(?i)https?://docs\.braindrive\.ai/core/PLUGIN_DEVELOPER_QUICKSTART",
        replacement: "https://docs.braindrive.ai/core/getting-started/plugin-developer-quickstart",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"(?i)/core/PLUGIN_DEVELOPER_QUICKSTART",
        replacement: "/core/getting-started/plugin-developer-quickstart",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"(?i)https?://docs\.braindrive\.ai/core/ROADMAP",
        replacement: "https://community.braindrive.ai/t/braindrive-development-progress-updates/92",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"(?i)/core/ROADMAP",
        replacement: "https://community.braindrive.ai/t/braindrive-development-progress-updates/92",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"\[\*\*Service Bridges\*\*\]\(\)",
        replacement: "[**Service Bridges**](https://docs.braindrive.ai/services/intro)",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    RuleSpec {
        pattern: r"\]\((?:\.{1,2}/)?SECURITY\.md\)",
        replacement: "](https://github.com/BrainDriveAI/BrainDrive-Core/blob/main/SECURITY.md)",
        applies: Applies::Repo("BrainDrive-Core"),
    },
    // PluginTemplate docs that intentionally stay upstream
    RuleSpec {
        pattern: r"\]\(\./DEVELOPMENT\.md\)",
        replacement: "](https://github.com/BrainDriveAI/PluginTemplate/blob/main/DEVELOPMENT.md)",
        applies: Applies::Repo("PluginTemplate"),
    },
    RuleSpec {
        pattern: r"\]\(\./Plugin-Template-Plan\.md\)",
        replacement: "](https://github.com/BrainDriveAI/PluginTemplate/blob/main/Plugin-Template-Plan.md)",
        applies: Applies::Repo("PluginTemplate"),
    },
    RuleSpec {
        pattern: r"\]\(\.\./PluginBuild/PluginTemplate/DEVELOPMENT\.md\)",
        replacement: "](https://github.com/BrainDriveAI/PluginTemplate/blob/main/PluginBuild/PluginTemplate/DEVELOPMENT.md)",
        applies: Applies::Repo("PluginTemplate"),
    },
    RuleSpec {
        pattern: r"\]\(\./Service-Integration-Guide\.md\)",
        replacement: "](https://github.com/BrainDriveAI/PluginTemplate/blob/main/Service-Integration-Guide.md)",
        applies: Applies::Repo("PluginTemplate"),
    },
];

/// A compiled, repository-specific sanitizer.
pub struct Sanitizer {
    rules: Vec<(Regex, String)>,
    inline_code: Regex,
    fence: Regex,
}

impl Sanitizer {
    /// Compile the rule table for one repository (`owner/name`).
    pub fn for_repo(repo: &str) -> Result<Self> {
        let repo_name = repo.rsplit('/').next().unwrap_or(repo);

        let mut rules = Vec::new();
        for spec in GENERAL_RULES {
            rules.push((Regex::new(spec.pattern)?, spec.replacement.to_string()));
        }
        // Stale absolute doc prefixes: "docs/repos/<RepoName>/..."
        rules.push((
            Regex::new(&format!(r"docs/repos/{}/", regex::escape(repo_name)))?,
            String::new(),
        ));
        for spec in REPO_RULES {
            let matches_repo = match spec.applies {
                Applies::Any => true,
                Applies::Repo(name) => name == repo_name,
            };
            if matches_repo {
                rules.push((Regex::new(spec.pattern)?, spec.replacement.to_string()));
            }
        }

        Ok(Self {
            rules,
            inline_code: Regex::new("`+[^`]*`+")?,
            fence: Regex::new(r"^\s*(`{3,}|~{3,})")?,
        })
    }

    /// Sanitize a whole document, leaving fenced code blocks verbatim.
    pub fn sanitize_text(&self, text: &str) -> String {
        let mut in_fence = false;
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| {
                if self.fence.is_match(line) {
                    in_fence = !in_fence;
                    line.to_string()
                } else if in_fence {
                    line.to_string()
                } else {
                    self.sanitize_line(line)
                }
            })
            .collect();
        lines.join("\n")
    }

    /// Sanitize one line, leaving inline code spans verbatim.
    fn sanitize_line(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut last = 0;
        for m in self.inline_code.find_iter(line) {
            out.push_str(&self.apply_rules(&line[last..m.start()]));
            out.push_str(m.as_str());
            last = m.end();
        }
        out.push_str(&self.apply_rules(&line[last..]));
        out
    }

    fn apply_rules(&self, segment: &str) -> String {
        let mut s = segment.to_string();
        for (pattern, replacement) in &self.rules {
            s = pattern.replace_all(&s, replacement.as_str()).into_owned();
        }
        s
    }
}

/// Rewrite every Markdown/MDX file under `dest` for the given repository.
///
/// Returns the number of files rewritten. A file that cannot be read as
/// UTF-8 is skipped with a warning rather than failing the source.
pub fn sanitize_tree(dest: &Path, repo: &str) -> Result<usize> {
    let sanitizer = Sanitizer::for_repo(repo)?;
    let mut rewritten = 0;

    for entry in WalkDir::new(dest).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let text = match fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(e) => {
                warn!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        let sanitized = sanitizer.sanitize_text(&text);
        if sanitized != text {
            fs::write(entry.path(), sanitized)?;
            rewritten += 1;
        }
    }

    Ok(rewritten)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx"))
}
