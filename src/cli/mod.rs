//! CLI module for prooflog
//!
//! Provides command-line interface for:
//! - check: replay claims through validation
//! - audit: load claims as history and report orphans
//! - tree: print one run's proof tree

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ReplayArgs};
pub use commands::{audit, check, load_engine, run, run_command, tree, CheckReport, Rejection};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_claim_lines, read_hierarchy, write_error, write_response, write_text};
