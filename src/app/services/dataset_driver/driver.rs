//! Generic dataset driver loop

use std::io::BufRead;
use tracing::{debug, info, info_span, warn};

use super::handler::ParticleDataHandler;
use crate::Result;
use crate::app::models::{DataMode, ParseOutcome};
use crate::app::services::dcl_full_parser::{
    DclFullParser, RecoverableParseError, ScanStats,
};
use crate::app::services::exception_sink::NullSink;
use crate::constants::DEFAULT_BATCH_SIZE;

/// Caller supplied context for one driver run
///
/// The parsing core never reads it; the label only tags log output.
#[derive(Debug, Clone, Default)]
pub struct DriverContext {
    pub label: Option<String>,
}

impl DriverContext {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("unlabelled")
    }
}

/// Drives one parser over one input stream into a handler
#[derive(Debug)]
pub struct SimpleDatasetDriver<H> {
    context: DriverContext,
    mode: DataMode,
    batch_size: usize,
    max_records: Option<usize>,
    handler: H,
}

impl<H: ParticleDataHandler> SimpleDatasetDriver<H> {
    pub fn new(context: DriverContext, mode: DataMode, handler: H) -> Self {
        Self {
            context,
            mode,
            batch_size: DEFAULT_BATCH_SIZE,
            max_records: None,
            handler,
        }
    }

    /// Units of work pulled before the batch's particles are published
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Stop after this many units of work (particles plus exceptions)
    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Build the parser for this driver's delivery mode
    pub fn build_parser<R: BufRead>(&self, reader: R) -> DclFullParser<R, NullSink> {
        DclFullParser::new(self.mode, reader, NullSink)
    }

    /// Parse the whole stream, publishing particles in source order
    pub fn process_file_stream<R: BufRead>(&mut self, reader: R) -> Result<ScanStats> {
        let span = info_span!("driver", label = self.context.label(), mode = %self.mode);
        let _guard = span.enter();

        let mut parser = self.build_parser(reader);
        let mut units = 0usize;
        let mut batch = Vec::with_capacity(self.batch_size);

        loop {
            let remaining = self.max_records.map_or(usize::MAX, |max| max - units);
            let batch_limit = self.batch_size.min(remaining);
            if batch_limit == 0 {
                break;
            }

            let mut pulled = 0;
            while pulled < batch_limit {
                match parser.next_outcome()? {
                    Some(ParseOutcome::Particle(particle)) => batch.push(particle),
                    Some(ParseOutcome::Exception(error)) => self.exception_callback(error),
                    None => break,
                }
                pulled += 1;
            }
            units += pulled;

            for particle in batch.drain(..) {
                self.handler
                    .add_particle_sample(particle.stream_name(), particle);
            }

            if pulled < batch_limit {
                break;
            }
        }

        if !parser.is_exhausted() {
            debug!("Stopped after {} units, input not exhausted", units);
        }

        let stats = parser.stats().clone();
        info!(
            "Produced {} particles with {} exceptions from {} lines",
            stats.particles_produced, stats.exceptions, stats.lines_read
        );
        Ok(stats)
    }

    fn exception_callback(&mut self, error: RecoverableParseError) {
        warn!("Recoverable parse exception: {}", error);
        self.handler.set_particle_data_capture_failure();
    }
}
