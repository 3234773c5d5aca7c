//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use docsite::output::OutputConfig;

/// Docsite - Aggregate upstream documentation into the docs site
#[derive(Parser, Debug)]
#[command(name = "docsite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize upstream documentation into the site's content folders
    Sync(commands::sync::SyncArgs),

    /// Resolve the edit URL for a document
    Resolve(commands::resolve::ResolveArgs),

    /// Show which repositories populate the site's content folders
    Status(commands::status::StatusArgs),

    /// Build the site and check it for broken links
    CheckLinks(commands::check_links::CheckLinksArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .init();
        let out = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &out),
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Status(args) => commands::status::execute(args),
            Commands::CheckLinks(args) => commands::check_links::execute(args, &out),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
