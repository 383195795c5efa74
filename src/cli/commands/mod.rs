//! Command implementations for NUTNR processor CLI
//!
//! Each command lives in its own module; shared helpers for logging,
//! configuration, input discovery and progress reporting are in [`shared`].

pub mod process;
pub mod shared;
pub mod validate;

pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner for NUTNR processor
///
/// Dispatches to the subcommand handler named in `args`. Callers are expected
/// to have checked that a subcommand is present.
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.command {
        Some(Commands::Process(process_args)) => process::run_process(process_args).await,
        Some(Commands::Validate(validate_args)) => validate::run_validate(validate_args).await,
        None => Ok(ProcessingStats::default()),
    }
}
