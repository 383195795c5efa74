//! Process command implementation for NUTNR processor CLI
//!
//! Parses every input file with its own parser and writes the particles as
//! JSON lines, either one output file per input or to stdout.

use super::shared::{
    FileReport, ProcessingStats, create_progress_bar, discover_inputs, display_name,
    load_configuration, process_files_concurrently, setup_logging,
};
use crate::app::models::DataMode;
use crate::app::services::dataset_driver::{
    DRIVER_VERSION, DriverContext, JsonLinesWriter, ParticleCollector, ParticleDataHandler,
    SimpleDatasetDriver,
};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Where a worker sends the particles of one file
#[derive(Debug, Clone)]
enum Destination {
    /// `<dir>/<file name>.<mode>.jsonl`
    Directory(PathBuf),
    /// Buffered and written to stdout in input order
    Stdout,
    /// Counted only
    Discard,
}

/// Per-file parse settings handed to workers
#[derive(Debug, Clone)]
struct FileJob {
    mode: DataMode,
    batch_size: usize,
    max_records: Option<usize>,
    destination: Destination,
}

/// Process command runner for NUTNR processor
///
/// 1. Load configuration and apply command line overrides
/// 2. Resolve inputs into log files
/// 3. Parse files concurrently, writing particles as they are published
/// 4. Print a summary
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    args.validate()?;
    let mut config = load_configuration(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, &args);
    config.validate()?;

    setup_logging(&config.logging.level, args.verbosity.quiet)?;
    info!(
        "Starting NUTNR processor (driver {}) in {} mode",
        DRIVER_VERSION, config.parser.mode
    );
    debug!("Loaded configuration: {:?}", config);

    let files = discover_inputs(&args.inputs, &config.processing.file_suffix)?;
    if files.is_empty() {
        info!("No input files found");
        return Ok(ProcessingStats::default());
    }

    let destination = match (&config.processing.output_path, args.format) {
        (_, OutputFormat::Summary) => Destination::Discard,
        (Some(dir), OutputFormat::Jsonl) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::io(format!("Failed to create output directory {}", dir.display()), e)
            })?;
            Destination::Directory(dir.clone())
        }
        (None, OutputFormat::Jsonl) => Destination::Stdout,
    };

    let job = FileJob {
        mode: config.parser.mode,
        batch_size: config.parser.batch_size,
        max_records: args.max_records,
        destination,
    };

    info!(
        "Processing {} files with up to {} workers",
        files.len(),
        config.processing.max_concurrent_files
    );

    let progress_bar = args
        .verbosity
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "Parsing logs..."));

    let results = process_files_concurrently(
        files,
        config.processing.max_concurrent_files,
        progress_bar.as_ref(),
        move |path| process_file(path, &job),
    )
    .await;

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let mut stats = ProcessingStats::default();
    let mut reports = Vec::new();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    for (path, result) in results {
        match result {
            Ok((report, buffer)) => {
                if let Some(buffer) = buffer {
                    stdout
                        .write_all(&buffer)
                        .map_err(|e| Error::io("Failed to write particles to stdout", e))?;
                }
                stats.record(&report);
                reports.push(report);
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                stats.record_failure(path, &e);
            }
        }
    }
    stdout
        .flush()
        .map_err(|e| Error::io("Failed to flush stdout", e))?;
    drop(stdout);

    stats.processing_time = start_time.elapsed();

    if !args.verbosity.quiet {
        let mut summary = Vec::new();
        write_summary(&mut summary, &stats, &reports, config.parser.mode)
            .map_err(|e| Error::io("Failed to format summary", e))?;
        // Keep stdout clean for particles
        let written = if args.particles_to_stdout() {
            std::io::stderr().write_all(&summary)
        } else {
            std::io::stdout().write_all(&summary)
        };
        written.map_err(|e| Error::io("Failed to write summary", e))?;
    }

    Ok(stats)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(mode) = args.mode {
        config.parser.mode = mode.into();
    }
    if let Some(output_path) = &args.output_path {
        config.processing.output_path = Some(output_path.clone());
    }
    if let Some(jobs) = args.jobs {
        config.processing.max_concurrent_files = jobs;
    }
    if let Some(level) = args.verbosity.log_level() {
        config.logging.level = level.to_string();
    }
}

/// Output file for one input
pub fn output_file_for(output_dir: &Path, input: &Path, mode: DataMode) -> PathBuf {
    output_dir.join(format!("{}.{}.jsonl", display_name(input), mode))
}

fn process_file(path: &Path, job: &FileJob) -> Result<(FileReport, Option<Vec<u8>>)> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
    let reader = BufReader::new(file);
    let context = DriverContext::labelled(display_name(path));

    let mut report = FileReport {
        path: path.to_path_buf(),
        ..Default::default()
    };

    let buffer = match &job.destination {
        Destination::Directory(dir) => {
            let output = output_file_for(dir, path, job.mode);
            let out_file = File::create(&output)
                .map_err(|e| Error::io(format!("Failed to create {}", output.display()), e))?;
            let writer = JsonLinesWriter::new(BufWriter::new(out_file));
            let mut driver = new_driver(context, job, writer);
            report.stats = driver.process_file_stream(reader)?;
            let writer = driver.into_handler();
            report.stream_counts = writer.stream_counts().clone();
            writer.finish()?;
            report.output = Some(output);
            None
        }
        Destination::Stdout => {
            let mut driver = new_driver(context, job, JsonLinesWriter::new(Vec::new()));
            report.stats = driver.process_file_stream(reader)?;
            let writer = driver.into_handler();
            report.stream_counts = writer.stream_counts().clone();
            Some(writer.finish()?)
        }
        Destination::Discard => {
            let mut driver = new_driver(context, job, ParticleCollector::new());
            report.stats = driver.process_file_stream(reader)?;
            report.stream_counts = driver.handler().stream_counts().clone();
            None
        }
    };

    Ok((report, buffer))
}

fn new_driver<H>(context: DriverContext, job: &FileJob, handler: H) -> SimpleDatasetDriver<H>
where
    H: ParticleDataHandler,
{
    SimpleDatasetDriver::new(context, job.mode, handler)
        .with_batch_size(job.batch_size)
        .with_max_records(job.max_records)
}

/// Write the human-readable run summary
fn write_summary<W: Write>(
    out: &mut W,
    stats: &ProcessingStats,
    reports: &[FileReport],
    mode: DataMode,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "NUTNR Processing Complete".bright_green().bold())?;
    writeln!(out, "{}", "━".repeat(48))?;

    for report in reports {
        let exceptions = if report.stats.exceptions > 0 {
            report.stats.exceptions.to_string().bright_red()
        } else {
            report.stats.exceptions.to_string().normal()
        };
        writeln!(
            out,
            "  {} {} particles ({} metadata), {} exceptions",
            display_name(&report.path).bright_cyan(),
            report.stats.particles_produced,
            report.stats.metadata_particles,
            exceptions
        )?;
        if let Some(output) = &report.output {
            writeln!(out, "    {} {}", "->".bright_black(), output.display())?;
        }
    }

    let mut streams = std::collections::BTreeMap::new();
    for report in reports {
        for (stream, count) in &report.stream_counts {
            *streams.entry(stream.as_str()).or_insert(0usize) += count;
        }
    }

    writeln!(out)?;
    writeln!(out, "  {} {}", "Mode:".bright_cyan(), mode)?;
    writeln!(out, "  {} {}", "Files processed:".bright_cyan(), stats.files_processed)?;
    writeln!(
        out,
        "  {} {}",
        "Particles:".bright_cyan(),
        stats.totals.particles_produced
    )?;
    for (stream, count) in &streams {
        writeln!(out, "    • {}: {}", stream, count)?;
    }
    writeln!(
        out,
        "  {} {} ({:.1}% of units produced a particle)",
        "Exceptions:".bright_cyan(),
        stats.totals.exceptions,
        stats.totals.success_rate()
    )?;
    writeln!(
        out,
        "  {} {}",
        "Processing time:".bright_cyan(),
        HumanDuration(stats.processing_time)
    )?;

    if !stats.failed_files.is_empty() {
        writeln!(
            out,
            "\n{} {}",
            "Failed files:".bright_red().bold(),
            stats.failed_files.len()
        )?;
        for (path, reason) in &stats.failed_files {
            writeln!(out, "  • {}: {}", path.display(), reason)?;
        }
    }

    writeln!(out)
}
