//! # Resolve Command Implementation
//!
//! Implements the `resolve` subcommand, which computes the "edit this
//! page" URL for a document exactly as the site build does. Useful for
//! wiring the site generator to this tool and for checking overrides and
//! marker metadata without running a build.
//!
//! The document can be given as a plain logical path (`--doc`) or as the
//! structured JSON payload the site generator hands to its edit-URL hook
//! (`--payload-json`).

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use docsite::config;
use docsite::edit_url::{self, DocRef};

/// Resolve the edit URL for a document
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Content collection the document belongs to (core, template,
    /// services, plugins).
    #[arg(short, long, value_name = "ID")]
    pub collection: String,

    /// Logical document path within the collection, e.g.
    /// `getting-started/install.md`.
    #[arg(value_name = "DOC")]
    pub doc: Option<String>,

    /// Structured payload as JSON, e.g.
    /// `{"source": "@site/docs-core/how-to/use.md"}`.
    #[arg(long, value_name = "JSON", conflicts_with = "doc")]
    pub payload_json: Option<String>,

    /// Site root directory (markers and probe targets are read from here).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs) -> Result<()> {
    let doc = match (&args.doc, &args.payload_json) {
        (Some(path), None) => DocRef::path(path.clone()),
        (None, Some(json)) => serde_json::from_str(json)?,
        _ => bail!("provide a document path or --payload-json"),
    };

    let site = config::default_site();
    let collection = site.collection(&args.collection)?;
    let resolver = edit_url::resolver_for(&site, collection, &args.dir)?;

    println!("{}", resolver.resolve(&doc)?);
    Ok(())
}
