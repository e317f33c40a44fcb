//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scripted browser verification: run scenarios against a running web
/// application and capture screenshots for manual review
#[derive(Debug, Parser)]
#[command(name = "verificador", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print failures
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run verification scenarios
    Run(RunArgs),
    /// List available scenarios
    List(ListArgs),
}

/// Arguments for `verificador run`
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Run a single scenario by name
    #[arg(long)]
    pub scenario: Option<String>,

    /// Directory of extra YAML scenario files
    #[arg(long)]
    pub spec_dir: Option<PathBuf>,

    /// Write a JSON suite report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub headful: bool,

    /// Chromium binary path
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium: Option<PathBuf>,

    /// Disable the browser sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,
}

/// Arguments for `verificador list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory of extra YAML scenario files
    #[arg(long)]
    pub spec_dir: Option<PathBuf>,
}
