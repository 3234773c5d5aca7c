//! # Sync Command Implementation
//!
//! Implements the `sync` subcommand: clone every configured upstream
//! documentation repository and rebuild the local content folders from
//! them.
//!
//! ## Functionality
//!
//! - **Source selection**: the built-in BrainDrive source list by default,
//!   a YAML manifest with `--manifest`, optionally narrowed with `--only`.
//! - **Destructive by design**: each destination folder is cleared before
//!   it is repopulated, so the command asks for confirmation on an
//!   interactive terminal unless `--yes` is given.
//! - **Authentication**: a token in `GH_TOKEN` is injected into clone URLs
//!   for private or rate-limited repositories.
//! - **Exit status**: a clone failure or empty docs tree on a required
//!   source fails the whole run with non-zero status; optional sources are
//!   skipped with a warning.

use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use docsite::config::{self, SourceSpec};
use docsite::output::OutputConfig;
use docsite::sync::{self, Outcome, SyncOptions};

/// Synchronize upstream documentation into the site's content folders
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Site root directory containing the content folders.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// YAML manifest with the source list; defaults to the built-in
    /// BrainDrive sources.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Restrict the run to the given source keys (repeatable).
    #[arg(long, value_name = "KEY")]
    pub only: Vec<String>,

    /// Scratch directory for clones.
    ///
    /// Defaults to `.cache/sources` under the site root. Recreated at the
    /// start of every run.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds allowed per clone before it is treated as failed.
    ///
    /// Can also be set with the `DOCSITE_CLONE_TIMEOUT` environment
    /// variable.
    #[arg(long, value_name = "SECS", env = "DOCSITE_CLONE_TIMEOUT", default_value_t = 300)]
    pub clone_timeout: u64,

    /// Do not ask for confirmation before clearing destination folders.
    #[arg(long)]
    pub yes: bool,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, out: &OutputConfig) -> Result<()> {
    let mut specs = match &args.manifest {
        Some(path) => config::sources_from_file(path)?,
        None => config::default_sources(),
    };

    if !args.only.is_empty() {
        for key in &args.only {
            if !specs.iter().any(|s| &s.key == key) {
                bail!("unknown source key '{}'", key);
            }
        }
        specs.retain(|s| args.only.contains(&s.key));
    }

    if !args.yes && console::user_attended() {
        let destinations: Vec<&str> = specs.iter().map(|s| s.dest.as_str()).collect();
        let proceed = Confirm::new()
            .with_prompt(format!(
                "This will clear and rebuild {} content folder(s) under {} ({}). Continue?",
                specs.len(),
                args.dir.display(),
                destinations.join(", ")
            ))
            .default(true)
            .interact()?;
        if !proceed {
            println!("Sync cancelled.");
            return Ok(());
        }
    }

    let mut opts = SyncOptions::new(&args.dir);
    if let Some(cache_dir) = args.cache_dir {
        opts.cache_dir = cache_dir;
    }
    opts.clone_timeout = Duration::from_secs(args.clone_timeout);
    opts.token = std::env::var(config::TOKEN_ENV).ok().filter(|t| !t.is_empty());

    let spinner = progress_spinner(out, &specs);
    let report = sync::run(&specs, &opts);
    spinner.finish_and_clear();

    let report = report.with_context(|| "synchronization failed")?;

    for outcome in &report.outcomes {
        match outcome {
            Outcome::Synced {
                repo,
                dest,
                strategy,
                ..
            } => {
                println!(
                    "{} Synced {} -> {} [{}]",
                    out.emoji("✅", "[OK]"),
                    repo,
                    dest,
                    strategy
                );
            }
            Outcome::Skipped { repo, reason, .. } => {
                println!(
                    "{} Skipped {} ({})",
                    out.emoji("⚠️ ", "[SKIP]"),
                    repo,
                    reason
                );
            }
        }
    }

    println!(
        "\n{} {} source(s) synced, {} skipped.",
        out.emoji("📦", "[DONE]"),
        report.synced().count(),
        report.skipped().count()
    );
    Ok(())
}

fn progress_spinner(out: &OutputConfig, specs: &[SourceSpec]) -> ProgressBar {
    if !out.use_color {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Syncing {} source(s)...", specs.len()));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
