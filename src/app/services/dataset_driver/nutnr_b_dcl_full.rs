//! Driver entry points for NUTNR-B DCL full-frame logs

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use super::driver::{DriverContext, SimpleDatasetDriver};
use super::handler::ParticleDataHandler;
use crate::app::models::DataMode;
use crate::{Error, Result};

/// Parse a recovered log file into `handler` and hand it back
pub fn parse_recovered<H: ParticleDataHandler>(
    context: &DriverContext,
    source_file_path: &Path,
    handler: H,
) -> Result<H> {
    parse_file(DataMode::Recovered, context, source_file_path, handler)
}

/// Parse a telemetered log file into `handler` and hand it back
pub fn parse_telemetered<H: ParticleDataHandler>(
    context: &DriverContext,
    source_file_path: &Path,
    handler: H,
) -> Result<H> {
    parse_file(DataMode::Telemetered, context, source_file_path, handler)
}

/// Parse one log file in the given mode
///
/// The file is closed when this returns, whatever the outcome.
pub fn parse_file<H: ParticleDataHandler>(
    mode: DataMode,
    context: &DriverContext,
    source_file_path: &Path,
    handler: H,
) -> Result<H> {
    if !source_file_path.exists() {
        return Err(Error::file_not_found(
            source_file_path.display().to_string(),
        ));
    }

    info!(
        "Parsing {} log: {}",
        mode,
        source_file_path.display()
    );

    let file = File::open(source_file_path).map_err(|e| {
        Error::io(
            format!("Failed to open {}", source_file_path.display()),
            e,
        )
    })?;

    let mut driver = SimpleDatasetDriver::new(context.clone(), mode, handler);
    driver.process_file_stream(BufReader::new(file))?;
    Ok(driver.into_handler())
}
