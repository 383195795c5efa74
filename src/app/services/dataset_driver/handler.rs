//! Downstream particle consumers

use std::collections::BTreeMap;
use std::io::Write;

use crate::app::models::Particle;
use crate::{Error, Result};

/// Consumer of a driver's output
pub trait ParticleDataHandler {
    /// Accept one particle published on `stream_name`
    fn add_particle_sample(&mut self, stream_name: &str, particle: Particle);

    /// Note that at least one record of the file could not be decoded
    fn set_particle_data_capture_failure(&mut self);
}

impl<H: ParticleDataHandler + ?Sized> ParticleDataHandler for &mut H {
    fn add_particle_sample(&mut self, stream_name: &str, particle: Particle) {
        (**self).add_particle_sample(stream_name, particle);
    }

    fn set_particle_data_capture_failure(&mut self) {
        (**self).set_particle_data_capture_failure();
    }
}

/// Handler that keeps every particle in memory
#[derive(Debug, Default)]
pub struct ParticleCollector {
    particles: Vec<Particle>,
    stream_counts: BTreeMap<String, usize>,
    failures: usize,
}

impl ParticleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }

    /// Particle counts keyed by stream name
    pub fn stream_counts(&self) -> &BTreeMap<String, usize> {
        &self.stream_counts
    }

    /// True if any record failed to decode
    pub fn capture_failed(&self) -> bool {
        self.failures > 0
    }

    /// Number of failure notifications received
    pub fn failure_count(&self) -> usize {
        self.failures
    }
}

impl ParticleDataHandler for ParticleCollector {
    fn add_particle_sample(&mut self, stream_name: &str, particle: Particle) {
        *self.stream_counts.entry(stream_name.to_string()).or_insert(0) += 1;
        self.particles.push(particle);
    }

    fn set_particle_data_capture_failure(&mut self) {
        self.failures += 1;
    }
}

/// Handler that writes each particle as one JSON object per line
///
/// The trait methods cannot fail, so the first write error is held and
/// returned by [`JsonLinesWriter::finish`]; later particles are dropped.
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    written: usize,
    stream_counts: BTreeMap<String, usize>,
    failures: usize,
    error: Option<Error>,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            stream_counts: BTreeMap::new(),
            failures: 0,
            error: None,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn stream_counts(&self) -> &BTreeMap<String, usize> {
        &self.stream_counts
    }

    pub fn failure_count(&self) -> usize {
        self.failures
    }

    /// Flush and return the writer, or the first error met while writing
    pub fn finish(mut self) -> Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush particle output", e))?;
        Ok(self.writer)
    }

    fn write_particle(&mut self, particle: &Particle) -> Result<()> {
        serde_json::to_writer(&mut self.writer, particle).map_err(|e| {
            Error::serialization(
                format!("Failed to serialize particle from line {}", particle.line_number),
                e,
            )
        })?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| Error::io("Failed to write particle output", e))
    }
}

impl<W: Write> ParticleDataHandler for JsonLinesWriter<W> {
    fn add_particle_sample(&mut self, stream_name: &str, particle: Particle) {
        if self.error.is_some() {
            return;
        }
        match self.write_particle(&particle) {
            Ok(()) => {
                self.written += 1;
                *self.stream_counts.entry(stream_name.to_string()).or_insert(0) += 1;
            }
            Err(error) => self.error = Some(error),
        }
    }

    fn set_particle_data_capture_failure(&mut self) {
        self.failures += 1;
    }
}
