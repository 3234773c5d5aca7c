//! # Shim and Landing-Page Generation
//!
//! Shims are local documents regenerated on every sync run that proxy to
//! files inside the synced tree or external resources: an `INSTALL.mdx`
//! page importing the install guide from wherever it actually landed, the
//! `_category_.json` sidebar descriptors of the plugin collections, and
//! literal wrapper pages around imported root documents.
//!
//! The landing page guarantees every collection has an entry route even
//! when the upstream repository ships no `intro.md` of its own.

use std::fs;
use std::path::Path;

use log::warn;
use serde_json::json;

use crate::config::{ShimBody, ShimSpec, SourceSpec};
use crate::error::Result;
use crate::path::find_existing_file;

/// Name of the synthesized landing document.
pub const LANDING_PAGE: &str = "intro.md";

/// Write all configured shims for one source into its destination.
pub fn write_shims(spec: &SourceSpec, dest: &Path) -> Result<()> {
    for shim in &spec.shims {
        let content = render(spec, shim, dest)?;
        let shim_path = dest.join(&shim.path);
        if let Some(parent) = shim_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&shim_path, content)?;
    }
    Ok(())
}

fn render(spec: &SourceSpec, shim: &ShimSpec, dest: &Path) -> Result<String> {
    let rendered = match &shim.body {
        ShimBody::Literal { content } => content.clone(),
        ShimBody::Import {
            title,
            component,
            candidates,
        } => {
            let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();
            match find_existing_file(dest, &candidates) {
                Some(target) => format!(
                    "---\ntitle: {title}\n---\n\n\
                     import {component} from '@site/{dest_rel}/{target}';\n\n\
                     <{component} />\n",
                    title = title,
                    component = component,
                    dest_rel = spec.dest,
                    target = target,
                ),
                None => {
                    warn!(
                        "no shim target found for {}:{}, writing fallback",
                        spec.repo, shim.path
                    );
                    format!(
                        "---\ntitle: {title}\n---\n\n\
                         This guide is maintained in the upstream repository. See\n\
                         [{repo}](https://github.com/{repo}).\n",
                        title = title,
                        repo = spec.repo,
                    )
                }
            }
        }
        ShimBody::Category { label, position } => {
            let descriptor = json!({
                "label": label,
                "position": position,
                "collapsible": true,
                "collapsed": false,
            });
            let mut rendered = serde_json::to_string_pretty(&descriptor)?;
            rendered.push('\n');
            rendered
        }
    };
    Ok(rendered)
}

/// Synthesize `intro.md` when the destination has no landing document.
pub fn ensure_landing_page(spec: &SourceSpec, dest: &Path) -> Result<bool> {
    let intro = dest.join(LANDING_PAGE);
    if intro.exists() {
        return Ok(false);
    }
    fs::write(
        &intro,
        format!(
            "---\ntitle: Overview\n---\n# Overview\n\nThis section is synced from {}.\n",
            spec.repo
        ),
    )?;
    Ok(true)
}
