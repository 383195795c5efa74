//! Validate command implementation for NUTNR processor CLI
//!
//! Parses each file once per delivery mode and checks that both parses agree
//! on everything except stream names. Any recoverable exception or mode
//! disagreement marks the file as failed.

use super::shared::{
    ProcessingStats, create_progress_bar, discover_inputs, display_name, load_configuration,
    process_files_concurrently, setup_logging,
};
use crate::app::models::DataMode;
use crate::app::services::dataset_driver::{
    DriverContext, ParticleCollector, SimpleDatasetDriver,
};
use crate::app::services::dcl_full_parser::ScanStats;
use crate::cli::args::ValidateArgs;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of checking one file in both modes
#[derive(Debug, Clone)]
pub struct ModeComparison {
    pub path: PathBuf,
    pub recovered: ScanStats,
    pub telemetered: ScanStats,
    /// First particle index where the two parses disagree
    pub first_mismatch: Option<usize>,
}

impl ModeComparison {
    pub fn equivalent(&self) -> bool {
        self.first_mismatch.is_none()
    }

    pub fn passed(&self) -> bool {
        self.equivalent() && self.recovered.exceptions == 0
    }
}

/// Validate command runner for NUTNR processor
pub async fn run_validate(args: ValidateArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    let mut config = load_configuration(args.config_file.as_deref())?;
    if let Some(jobs) = args.jobs {
        config.processing.max_concurrent_files = jobs;
    }
    if let Some(level) = args.verbosity.log_level() {
        config.logging.level = level.to_string();
    }
    config.validate()?;

    setup_logging(&config.logging.level, args.verbosity.quiet)?;
    info!("Starting NUTNR log validation");
    debug!("Validation arguments: {:?}", args);

    let files = discover_inputs(&args.inputs, &config.processing.file_suffix)?;
    if files.is_empty() {
        warn!("No input files found");
        return Ok(ProcessingStats::default());
    }

    let progress_bar = args
        .verbosity
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "Validating logs..."));

    let batch_size = config.parser.batch_size;
    let results = process_files_concurrently(
        files,
        config.processing.max_concurrent_files,
        progress_bar.as_ref(),
        move |path| compare_modes(path, batch_size),
    )
    .await;

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let mut stats = ProcessingStats::default();
    let mut comparisons = Vec::new();
    for (path, result) in results {
        match result {
            Ok(comparison) => {
                stats.files_processed += 1;
                stats.totals.merge(&comparison.recovered);
                if !comparison.passed() {
                    stats.validation_failures += 1;
                }
                comparisons.push(comparison);
            }
            Err(e) => {
                error!("Failed to validate {}: {}", path.display(), e);
                stats.record_failure(path, &e);
            }
        }
    }
    stats.processing_time = start_time.elapsed();

    if !args.verbosity.quiet {
        print_report(&comparisons, &stats);
    }

    Ok(stats)
}

fn parse_in_mode(path: &Path, mode: DataMode, batch_size: usize) -> Result<(ScanStats, ParticleCollector)> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
    let context = DriverContext::labelled(display_name(path));
    let mut driver = SimpleDatasetDriver::new(context, mode, ParticleCollector::new())
        .with_batch_size(batch_size);
    let stats = driver.process_file_stream(BufReader::new(file))?;
    Ok((stats, driver.into_handler()))
}

/// Parse `path` in both modes and compare the particles
pub fn compare_modes(path: &Path, batch_size: usize) -> Result<ModeComparison> {
    let (recovered, rec_particles) = parse_in_mode(path, DataMode::Recovered, batch_size)?;
    let (telemetered, tel_particles) = parse_in_mode(path, DataMode::Telemetered, batch_size)?;

    let rec_particles = rec_particles.particles();
    let tel_particles = tel_particles.particles();

    let first_mismatch = rec_particles
        .iter()
        .zip(tel_particles)
        .position(|(rec, tel)| !rec.same_content(tel))
        .or_else(|| {
            (rec_particles.len() != tel_particles.len())
                .then(|| rec_particles.len().min(tel_particles.len()))
        })
        .or_else(|| (recovered.exceptions != telemetered.exceptions).then_some(0));

    if let Some(index) = first_mismatch {
        warn!(
            "{}: recovered and telemetered parses differ at particle {}",
            path.display(),
            index
        );
    }

    Ok(ModeComparison {
        path: path.to_path_buf(),
        recovered,
        telemetered,
        first_mismatch,
    })
}

fn print_report(comparisons: &[ModeComparison], stats: &ProcessingStats) {
    println!();
    println!("{}", "NUTNR Log Validation".bright_green().bold());
    println!("{}", "━".repeat(48));

    for comparison in comparisons {
        let status = if comparison.passed() {
            "ok".bright_green()
        } else {
            "FAIL".bright_red().bold()
        };
        println!(
            "  [{}] {}: {} particles, {} exceptions{}",
            status,
            display_name(&comparison.path).bright_cyan(),
            comparison.recovered.particles_produced,
            comparison.recovered.exceptions,
            if comparison.equivalent() {
                String::new()
            } else {
                format!(
                    ", modes disagree (telemetered: {} particles, {} exceptions)",
                    comparison.telemetered.particles_produced, comparison.telemetered.exceptions
                )
            }
        );
    }

    for (path, reason) in &stats.failed_files {
        println!("  [{}] {}: {}", "ERROR".bright_red().bold(), path.display(), reason);
    }

    println!();
    println!(
        "  {} {} of {} files passed in {}",
        "Summary:".bright_cyan(),
        stats.files_processed - stats.validation_failures,
        stats.files_processed + stats.failed_files.len(),
        HumanDuration(stats.processing_time)
    );
    println!();
}
