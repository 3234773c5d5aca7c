//! # Status Command Implementation
//!
//! Implements the `status` subcommand, which reads the marker files left
//! by the synchronizer and displays the synced-collection tree: which
//! repository populated each content folder and with which copy strategy.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::path::PathBuf;

use docsite::config::{self, CollectionMode};
use docsite::markers;

/// Show which repositories populate the site's content folders
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Site root directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs) -> Result<()> {
    let site = config::default_site();

    let mut collections = Vec::new();
    for collection in &site.collections {
        let content_root = args.dir.join(&collection.content_dir);
        let children = match &collection.mode {
            CollectionMode::Single { repo, .. } => {
                let label = match markers::read(&content_root)? {
                    Some(synced) => {
                        format!("{} [{}]", synced.repo, synced.edit_base)
                    }
                    None => format!("{} (not synced)", repo),
                };
                vec![TreeNode {
                    label,
                    children: vec![],
                }]
            }
            CollectionMode::PerKey { .. } => {
                let repos = markers::load_all(&content_root)?;
                if repos.is_empty() {
                    vec![TreeNode {
                        label: "(not synced)".to_string(),
                        children: vec![],
                    }]
                } else {
                    repos
                        .into_iter()
                        .map(|(key, synced)| TreeNode {
                            label: format!("{} -> {} [{}]", key, synced.repo, synced.edit_base),
                            children: vec![],
                        })
                        .collect()
                }
            }
        };
        collections.push(TreeNode {
            label: format!("{} ({})", collection.id, collection.content_dir),
            children,
        });
    }

    let root = TreeNode {
        label: format!("docs collections in {}", args.dir.display()),
        children: collections,
    };
    print_tree(&root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
