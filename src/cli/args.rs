//! Command-line argument definitions for NUTNR processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::DataMode;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the NUTNR log processor
///
/// Decodes NUTNR-B DCL full-frame logs into instrument, dark-instrument and
/// metadata particles.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nutnr-processor",
    version,
    about = "Decode NUTNR-B DCL full-frame logs into typed particles",
    long_about = "Parses nitrate sensor (NUTNR-B / ISUS) logs captured by a data concentrator \
                  logger. Each full ASCII frame becomes an instrument or dark-instrument particle \
                  and each block header becomes a metadata particle. Malformed lines are reported \
                  and skipped without stopping the parse."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the NUTNR processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse logs and write particles as JSON lines
    Process(ProcessArgs),
    /// Parse logs in both delivery modes and report problems
    Validate(ValidateArgs),
}

/// Delivery mode selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Recovered,
    Telemetered,
}

impl From<ModeArg> for DataMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Recovered => DataMode::Recovered,
            ModeArg::Telemetered => DataMode::Telemetered,
        }
    }
}

/// Output format for the process command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Particles as JSON lines followed by a summary
    #[default]
    Jsonl,
    /// Summary only
    Summary,
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Log files, directories or glob patterns to parse
    ///
    /// Directories are walked for files ending in the configured suffix
    /// (`.nutnr_b_dcl_full.log` by default).
    #[arg(value_name = "INPUTS", required = true)]
    pub inputs: Vec<String>,

    /// Delivery mode (overrides the configured mode)
    #[arg(short = 'm', long = "mode", value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Directory for per-file JSON lines output
    ///
    /// Each input `<name>` is written to `<DIR>/<name>.<mode>.jsonl`. Without
    /// this option particles go to stdout.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Jsonl,
        help = "Output format"
    )]
    pub format: OutputFormat,

    /// Stop each file after this many units of work (particles plus exceptions)
    #[arg(long = "max-records", value_name = "COUNT")]
    pub max_records: Option<usize>,

    /// Number of files parsed concurrently
    #[arg(short = 'j', long = "jobs", value_name = "COUNT")]
    pub jobs: Option<usize>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/nutnr-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl ProcessArgs {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.max_records == Some(0) {
            return Err(Error::configuration("--max-records must be greater than zero"));
        }
        if self.jobs == Some(0) {
            return Err(Error::configuration("--jobs must be greater than zero"));
        }
        if self.format == OutputFormat::Summary && self.output_path.is_some() {
            return Err(Error::configuration(
                "--output writes particles and cannot be combined with --format summary",
            ));
        }
        Ok(())
    }

    /// True when particles are written to stdout
    pub fn particles_to_stdout(&self) -> bool {
        self.format == OutputFormat::Jsonl && self.output_path.is_none()
    }
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Log files, directories or glob patterns to check
    #[arg(value_name = "INPUTS", required = true)]
    pub inputs: Vec<String>,

    /// Number of files parsed concurrently
    #[arg(short = 'j', long = "jobs", value_name = "COUNT")]
    pub jobs: Option<usize>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Logging flags shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Verbosity {
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Verbosity {
    /// Log level requested by flags, if any
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
