//! Scan statistics for DCL full-frame parsing

use serde::{Deserialize, Serialize};

/// Counters kept by a parser while it scans its input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Lines read from the input, blank lines included
    pub lines_read: usize,

    /// DCL status lines that carried no block information
    pub lines_ignored: usize,

    /// `Instrument started` messages seen
    pub blocks_started: usize,

    /// Particles handed out, metadata included
    pub particles_produced: usize,

    /// Metadata particles handed out
    pub metadata_particles: usize,

    /// Recoverable exceptions raised
    pub exceptions: usize,

    /// Repeated dark frames that started a new data block
    pub dark_resyncs: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of work completed: particles plus exceptions
    pub fn units(&self) -> usize {
        self.particles_produced + self.exceptions
    }

    /// Share of units that produced a particle, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.units() == 0 {
            0.0
        } else {
            (self.particles_produced as f64 / self.units() as f64) * 100.0
        }
    }

    /// Fold another parser's counters into this one
    pub fn merge(&mut self, other: &ScanStats) {
        self.lines_read += other.lines_read;
        self.lines_ignored += other.lines_ignored;
        self.blocks_started += other.blocks_started;
        self.particles_produced += other.particles_produced;
        self.metadata_particles += other.metadata_particles;
        self.exceptions += other.exceptions;
        self.dark_resyncs += other.dark_resyncs;
    }
}
