//! CLI argument definitions using clap
//!
//! Commands:
//! - prooflog check --hierarchy <path> --claims <path>
//! - prooflog audit --hierarchy <path> --claims <path>
//! - prooflog tree --hierarchy <path> --claims <path> --run <id>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// prooflog - replay and audit predicate claim logs
#[derive(Parser, Debug)]
#[command(name = "prooflog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Hierarchy document (JSON)
    #[arg(long)]
    pub hierarchy: PathBuf,

    /// Claims, one JSON object per line
    #[arg(long)]
    pub claims: PathBuf,

    /// Optional engine configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit every claim through validation and report rejections
    Check {
        #[command(flatten)]
        input: ReplayArgs,
    },

    /// Load claims without validation and report orphans per run
    Audit {
        #[command(flatten)]
        input: ReplayArgs,
    },

    /// Print the proof tree of one run
    Tree {
        #[command(flatten)]
        input: ReplayArgs,

        /// Correlation identifier of the run
        #[arg(long)]
        run: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
