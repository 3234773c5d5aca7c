//! # Check-Links Command Implementation
//!
//! Implements the `check-links` subcommand: build the static site into a
//! scratch directory, then run an external link crawler against the
//! output. The crawler owns all the actual link-checking logic; the only
//! contract here is "point it at a directory, it reports broken links via
//! its exit status".
//!
//! ## Environment
//!
//! - `CHECK_LINKS_EXTERNAL=0` skips the crawl (build only).
//! - `CHECK_LINKS_KEEP=1` keeps the scratch build directory around.
//!
//! A `.linkinator.json` next to the site root is passed to the default
//! crawler when present; otherwise a standard skip list for non-HTTP
//! schemes is applied.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use docsite::error::Error;
use docsite::output::OutputConfig;

/// Build the site and check it for broken links
#[derive(Args, Debug)]
pub struct CheckLinksArgs {
    /// Site root directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Site build command; `{out}` is replaced with the scratch build
    /// directory. Split on whitespace.
    #[arg(
        long,
        value_name = "CMD",
        default_value = "npx --yes docusaurus build --out-dir {out} --no-minify"
    )]
    pub build_cmd: String,

    /// Link crawler command; `{out}` is replaced with the build directory.
    /// Split on whitespace.
    #[arg(long, value_name = "CMD", default_value = "npx --yes linkinator {out} --recurse")]
    pub check_cmd: String,

    /// Skip the crawl and only verify that the site builds.
    #[arg(long)]
    pub skip_external: bool,
}

/// Execute the `check-links` command.
pub fn execute(args: CheckLinksArgs, out: &OutputConfig) -> Result<()> {
    let cache_dir = args.dir.join(".cache");
    let build_dir = cache_dir.join("link-check-build");
    fs::create_dir_all(&cache_dir)?;
    if build_dir.exists() {
        fs::remove_dir_all(&build_dir)?;
    }

    println!("{} Building site...", out.emoji("🔨", "[BUILD]"));
    run_tool(&args.build_cmd, &args.dir, &build_dir)?;

    let skip_external =
        args.skip_external || std::env::var("CHECK_LINKS_EXTERNAL").is_ok_and(|v| v == "0");
    if !skip_external {
        println!("{} Checking links...", out.emoji("🔍", "[CHECK]"));
        let mut check_cmd = args.check_cmd.clone();
        let config_path = args.dir.join(".linkinator.json");
        if config_path.exists() {
            check_cmd = format!("{} --config {}", check_cmd, config_path.display());
        } else if check_cmd.contains("linkinator") {
            check_cmd = format!("{} --skip mailto:,tel:,javascript:,data:,geo:", check_cmd);
        }
        run_tool(&check_cmd, &args.dir, &build_dir)?;
    }

    let keep_build = std::env::var("CHECK_LINKS_KEEP").is_ok_and(|v| v == "1");
    if !keep_build && build_dir.exists() {
        fs::remove_dir_all(&build_dir)?;
    }

    println!("{} No broken links found.", out.emoji("✅", "[OK]"));
    Ok(())
}

/// Run one whitespace-split command template with `{out}` substituted,
/// propagating a non-zero exit as an error.
fn run_tool(template: &str, cwd: &Path, out_dir: &Path) -> Result<()> {
    let rendered = template.replace("{out}", &out_dir.to_string_lossy());
    let mut parts = rendered.split_whitespace();
    let program = match parts.next() {
        Some(program) => program,
        None => bail!("empty command"),
    };

    let status = Command::new(program)
        .args(parts)
        .current_dir(cwd)
        .status()
        .with_context(|| format!("failed to start '{}'", program))?;

    if !status.success() {
        return Err(Error::Tool {
            tool: program.to_string(),
            message: format!("exited with status {}", status.code().unwrap_or(-1)),
        }
        .into());
    }
    Ok(())
}
