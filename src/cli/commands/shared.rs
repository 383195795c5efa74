//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::services::dcl_full_parser::ScanStats;
use crate::config::Config;
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of parsing one input file
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub path: PathBuf,
    pub stats: ScanStats,
    /// Particles published per stream
    pub stream_counts: BTreeMap<String, usize>,
    /// Where the particles were written, if to a file
    pub output: Option<PathBuf>,
}

/// Processing statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of files parsed to completion
    pub files_processed: usize,
    /// Files that could not be parsed, with the reason
    pub failed_files: Vec<(PathBuf, String)>,
    /// Counters summed over every processed file
    pub totals: ScanStats,
    /// Files that failed a validation check
    pub validation_failures: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

impl ProcessingStats {
    /// Fold one file's report into the totals
    pub fn record(&mut self, report: &FileReport) {
        self.files_processed += 1;
        self.totals.merge(&report.stats);
    }

    pub fn record_failure(&mut self, path: PathBuf, error: &Error) {
        self.failed_files.push((path, error.to_string()));
    }

    /// True when no file failed to parse or failed validation
    pub fn is_clean(&self) -> bool {
        self.failed_files.is_empty() && self.validation_failures == 0
    }
}

/// Set up structured logging
///
/// `RUST_LOG` wins over `level` when set.
pub fn setup_logging(level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nutnr_processor={}", level)));

    let result = if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Load configuration using layered approach (defaults -> file -> env)
///
/// Command line overrides are applied by each command afterwards.
pub fn load_configuration(config_file: Option<&Path>) -> Result<Config> {
    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, checking default location"),
    }
    Config::load_layered(config_file)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Resolve command line inputs into a sorted, de-duplicated list of files
///
/// Each input may be a file, a directory (walked for files ending in
/// `suffix`) or a glob pattern. An input that matches nothing is an error.
pub fn discover_inputs(inputs: &[String], suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);

        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let before = files.len();
            for entry in WalkDir::new(path).follow_links(false) {
                let entry = entry.map_err(|e| {
                    Error::directory_traversal(format!("Failed to walk {}", path.display()), e)
                })?;
                let matches_suffix = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(suffix));
                if entry.file_type().is_file() && matches_suffix {
                    files.push(entry.into_path());
                }
            }
            if files.len() == before {
                warn!("No *{} files found in {}", suffix, path.display());
            }
        } else if is_glob_pattern(input) {
            let entries = glob::glob(input).map_err(|e| Error::pattern(input.as_str(), e))?;
            for entry in entries {
                let entry = entry.map_err(|e| {
                    let message = format!("Failed to read {}", e.path().display());
                    Error::io(message, e.into_error())
                })?;
                if entry.is_file() {
                    files.push(entry);
                }
            }
        } else {
            return Err(Error::file_not_found(input.as_str()));
        }
    }

    files.sort();
    files.dedup();

    debug!("Discovered {} input files", files.len());
    for file in &files {
        debug!("  Found: {}", file.display());
    }

    Ok(files)
}

/// Run `work` over every file on the blocking pool, at most `limit` at a time
///
/// Results come back sorted by path. A panicking worker is reported as that
/// file's error.
pub async fn process_files_concurrently<T, F>(
    files: Vec<PathBuf>,
    limit: usize,
    progress_bar: Option<&ProgressBar>,
    work: F,
) -> Vec<(PathBuf, Result<T>)>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<T> + Send + Sync + Clone + 'static,
{
    let mut results = stream::iter(files)
        .map(|path| {
            let work = work.clone();
            async move {
                let task_path = path.clone();
                let result = task::spawn_blocking(move || work(&task_path))
                    .await
                    .unwrap_or_else(|e| {
                        Err(Error::processing_interrupted(format!(
                            "Worker for {} failed: {}",
                            path.display(),
                            e
                        )))
                    });
                (path, result)
            }
        })
        .buffer_unordered(limit.max(1))
        .inspect(|(path, _)| {
            if let Some(pb) = progress_bar {
                pb.inc(1);
                if let Some(name) = path.file_name() {
                    pb.set_message(name.to_string_lossy().into_owned());
                }
            }
        })
        .collect::<Vec<_>>()
        .await;

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// File name of `path` as text, for reports
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
