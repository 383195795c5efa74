//! Core DCL full-frame parser implementation
//!
//! This module provides the pull loop: it reads one line at a time, classifies
//! it, tracks the current data block and hands out particles and recoverable
//! exceptions in source order.

use std::collections::VecDeque;
use std::io::BufRead;
use tracing::{debug, trace};

use super::classifier::{DclStamp, Frame, InstrumentFrameType, classify_line};
use super::error::RecoverableParseError;
use super::metadata::MetadataBuilder;
use super::particle_builder::{build_instrument_particle, build_metadata_particle};
use super::stats::ScanStats;
use super::validator::{ValidatedFrame, validate_frame};
use crate::Result;
use crate::app::models::{DataMode, ParseOutcome, Particle};
use crate::app::services::exception_sink::ExceptionSink;
use crate::constants::INSTRUMENT_STARTED_MESSAGE;

/// Parser construction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    /// Selects the particle streams the parser publishes on
    pub mode: DataMode,
}

impl From<DataMode> for ParserConfig {
    fn from(mode: DataMode) -> Self {
        Self { mode }
    }
}

/// Position within the current data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockPhase {
    /// Waiting for the block's dark frame
    AwaitingDark,
    /// Dark frame seen; light frames expected
    InData,
}

/// NUTNR-B DCL full-frame parser
///
/// Single pass and synchronous. Each instance owns its reader, line cursor and
/// counters, so two parsers over the same file never interact.
pub struct DclFullParser<R, S> {
    config: ParserConfig,
    reader: R,
    sink: S,
    line_buffer: Vec<u8>,
    line_number: usize,
    phase: BlockPhase,
    metadata: MetadataBuilder,
    pending: VecDeque<Particle>,
    stats: ScanStats,
    exhausted: bool,
}

impl<R: BufRead, S: ExceptionSink> DclFullParser<R, S> {
    /// Create a parser over `reader` reporting recoverable failures to `sink`
    pub fn new(config: impl Into<ParserConfig>, reader: R, sink: S) -> Self {
        Self {
            config: config.into(),
            reader,
            sink,
            line_buffer: Vec::with_capacity(4096),
            line_number: 0,
            phase: BlockPhase::AwaitingDark,
            metadata: MetadataBuilder::default(),
            pending: VecDeque::new(),
            stats: ScanStats::new(),
            exhausted: false,
        }
    }

    /// Parser publishing recovered particle streams
    pub fn recovered(reader: R, sink: S) -> Self {
        Self::new(DataMode::Recovered, reader, sink)
    }

    /// Parser publishing telemetered particle streams
    pub fn telemetered(reader: R, sink: S) -> Self {
        Self::new(DataMode::Telemetered, reader, sink)
    }

    pub fn mode(&self) -> DataMode {
        self.config.mode
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// True once the input is consumed and every queued particle handed out
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pending.is_empty()
    }

    /// Pull up to `max_count` units of work and return the particles among them
    ///
    /// Every exception is reported to the sink before the next unit is pulled.
    /// Stops early at end of input.
    pub fn get_records(&mut self, max_count: usize) -> Result<Vec<Particle>> {
        let mut particles = Vec::new();
        let mut units = 0;

        while units < max_count {
            match self.next_outcome()? {
                Some(ParseOutcome::Particle(particle)) => particles.push(particle),
                Some(ParseOutcome::Exception(error)) => self.sink.on_exception(error),
                None => break,
            }
            units += 1;
        }

        debug!(
            "Pulled {} units ({} particles) from {} lines",
            units,
            particles.len(),
            self.line_number
        );

        Ok(particles)
    }

    /// Pull the next unit of work without touching the sink
    ///
    /// Returns `Ok(None)` at end of input. Only I/O failures are errors.
    pub fn next_outcome(&mut self) -> Result<Option<ParseOutcome>> {
        loop {
            if let Some(particle) = self.pending.pop_front() {
                self.stats.particles_produced += 1;
                return Ok(Some(ParseOutcome::Particle(particle)));
            }

            if self.exhausted {
                return Ok(None);
            }

            let mut buffer = std::mem::take(&mut self.line_buffer);
            buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut buffer)?;

            let outcome = if bytes_read == 0 {
                self.exhausted = true;
                None
            } else {
                self.line_number += 1;
                self.stats.lines_read += 1;
                let line = String::from_utf8_lossy(&buffer);
                self.process_line(&line)
            };
            self.line_buffer = buffer;

            if let Some(error) = outcome {
                self.stats.exceptions += 1;
                trace!("{}", error);
                return Ok(Some(ParseOutcome::Exception(error)));
            }
        }
    }

    /// Classify and act on one line; returns the exception it raised, if any
    fn process_line(&mut self, line: &str) -> Option<RecoverableParseError> {
        match classify_line(self.line_number, line) {
            Frame::Blank => None,
            Frame::Status { stamp, message } => {
                self.handle_status(&stamp, message);
                None
            }
            Frame::Metadata { stamp, record } => {
                self.metadata.record(record, &stamp);
                None
            }
            Frame::Instrument(frame) => match validate_frame(&frame) {
                Ok(validated) => {
                    self.handle_instrument(validated);
                    None
                }
                Err(error) => Some(error),
            },
            Frame::Invalid(error) => Some(error),
        }
    }

    fn handle_status(&mut self, stamp: &DclStamp<'_>, message: &str) {
        if message.trim_start().starts_with(INSTRUMENT_STARTED_MESSAGE) {
            debug!(
                "Block {} started at {} (line {})",
                self.stats.blocks_started + 1,
                stamp.text,
                self.line_number
            );
            self.stats.blocks_started += 1;
            self.metadata = MetadataBuilder::started(stamp);
            self.phase = BlockPhase::AwaitingDark;
        } else {
            self.stats.lines_ignored += 1;
        }
    }

    fn handle_instrument(&mut self, frame: ValidatedFrame) {
        let mode = self.config.mode;

        if frame.frame_type == InstrumentFrameType::Dark {
            match self.phase {
                BlockPhase::AwaitingDark => {
                    let header = std::mem::take(&mut self.metadata);
                    let missing = header.missing_fields();
                    match header.build() {
                        Some(metadata) => {
                            self.pending
                                .push_back(build_metadata_particle(&metadata, &frame, mode));
                            self.stats.metadata_particles += 1;
                        }
                        None => debug!(
                            "No metadata particle for block ending at line {}: missing {:?}",
                            frame.line_number, missing
                        ),
                    }
                }
                BlockPhase::InData => {
                    debug!(
                        "Second dark frame in data block at line {}, starting a new data block",
                        frame.line_number
                    );
                    self.stats.dark_resyncs += 1;
                }
            }
            self.phase = BlockPhase::InData;
        }

        self.pending
            .push_back(build_instrument_particle(&frame, mode));
    }
}

impl<R: BufRead, S: ExceptionSink> Iterator for DclFullParser<R, S> {
    type Item = Result<ParseOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_outcome().transpose()
    }
}
