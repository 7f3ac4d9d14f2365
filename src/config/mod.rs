pub mod cli;
pub mod manifest;

#[cfg(feature = "cli")]
use crate::core::KindName;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "kind-shapes")]
#[command(about = "Render and check playlist and sandbox documents")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render every kind declared in a TOML manifest to JSON files
    Render {
        /// Path to the TOML manifest
        #[arg(short, long, default_value = "kinds.toml")]
        manifest: String,

        /// Override the manifest's output directory
        #[arg(short, long)]
        output: Option<String>,

        /// Override the manifest's pretty-print setting
        #[arg(long)]
        pretty: Option<bool>,

        /// Show what would be written without touching the disk
        #[arg(long)]
        dry_run: bool,
    },
    /// Decode JSON documents as the given kind and report problems
    Check {
        #[arg(short, long, value_enum)]
        kind: KindName,

        #[arg(required = true)]
        files: Vec<String>,
    },
}
