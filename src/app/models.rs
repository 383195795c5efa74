//! Data models for NUTNR processing
//!
//! This module contains the core data structures produced by the DCL full-frame
//! parser: the delivery mode axis, particle types and the decoded particles
//! themselves.

use crate::app::services::dcl_full_parser::RecoverableParseError;
use crate::constants::{NTP_UNIX_EPOCH_OFFSET_SECS, streams};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Delivery Mode
// =============================================================================

/// Data delivery mode for a parse
///
/// Both modes decode identical frame content; the mode only selects which
/// particle stream each record is published on. It is fixed when a parser is
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Data recovered from the instrument after deployment
    #[default]
    Recovered,
    /// Data sent ashore while the instrument is deployed
    Telemetered,
}

impl DataMode {
    /// Both modes, in a stable order
    pub const ALL: [DataMode; 2] = [DataMode::Recovered, DataMode::Telemetered];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataMode::Recovered => "recovered",
            DataMode::Telemetered => "telemetered",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recovered" | "rec" => Ok(DataMode::Recovered),
            "telemetered" | "tel" => Ok(DataMode::Telemetered),
            other => Err(Error::configuration(format!(
                "Invalid data mode '{}' (expected 'recovered' or 'telemetered')",
                other
            ))),
        }
    }
}

// =============================================================================
// Particle Types
// =============================================================================

/// Kind of record a particle was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Light full frame (NLF)
    Instrument,
    /// Dark full frame (NDF)
    DarkInstrument,
    /// Block metadata assembled from instrument console messages
    Metadata,
}

/// Concrete particle type: the cross product of kind and delivery mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleType {
    pub kind: ParticleKind,
    pub mode: DataMode,
}

impl ParticleType {
    pub fn new(kind: ParticleKind, mode: DataMode) -> Self {
        Self { kind, mode }
    }

    /// Stream identifier the particle is published on
    pub fn stream_name(&self) -> &'static str {
        match (self.kind, self.mode) {
            (ParticleKind::Instrument, DataMode::Telemetered) => streams::INSTRUMENT,
            (ParticleKind::Instrument, DataMode::Recovered) => streams::INSTRUMENT_RECOVERED,
            (ParticleKind::DarkInstrument, DataMode::Telemetered) => streams::DARK_INSTRUMENT,
            (ParticleKind::DarkInstrument, DataMode::Recovered) => {
                streams::DARK_INSTRUMENT_RECOVERED
            }
            (ParticleKind::Metadata, DataMode::Telemetered) => streams::METADATA,
            (ParticleKind::Metadata, DataMode::Recovered) => streams::METADATA_RECOVERED,
        }
    }

    pub fn is_instrument(&self) -> bool {
        matches!(
            self.kind,
            ParticleKind::Instrument | ParticleKind::DarkInstrument
        )
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stream_name())
    }
}

// =============================================================================
// Particles
// =============================================================================

/// A single decoded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticleValue {
    Int(i64),
    Float(f64),
    Text(String),
    IntArray(Vec<u32>),
}

impl ParticleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParticleValue::Float(v) => Some(*v),
            ParticleValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParticleValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParticleValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[u32]> {
        match self {
            ParticleValue::IntArray(v) => Some(v),
            _ => None,
        }
    }
}

/// Named value inside a particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleValueEntry {
    pub value_id: String,
    pub value: ParticleValue,
}

/// A decoded output record
///
/// Every particle corresponds to exactly one validated frame (or, for metadata,
/// one completed block header) and keeps the source line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub particle_type: ParticleType,

    /// Seconds since the NTP epoch (1900-01-01T00:00:00Z)
    pub internal_timestamp: f64,

    /// 1-based line of the source log the particle was completed on
    pub line_number: usize,

    /// Decoded values in publication order
    pub values: Vec<ParticleValueEntry>,
}

impl Particle {
    pub fn new(
        particle_type: ParticleType,
        internal_timestamp: f64,
        line_number: usize,
        values: Vec<ParticleValueEntry>,
    ) -> Self {
        Self {
            particle_type,
            internal_timestamp,
            line_number,
            values,
        }
    }

    pub fn stream_name(&self) -> &'static str {
        self.particle_type.stream_name()
    }

    pub fn kind(&self) -> ParticleKind {
        self.particle_type.kind
    }

    /// Look up a value by its identifier
    pub fn value(&self, value_id: &str) -> Option<&ParticleValue> {
        self.values
            .iter()
            .find(|entry| entry.value_id == value_id)
            .map(|entry| &entry.value)
    }

    /// True when both particles carry the same decoded content, whatever their mode
    pub fn same_content(&self, other: &Particle) -> bool {
        self.particle_type.kind == other.particle_type.kind
            && self.internal_timestamp == other.internal_timestamp
            && self.line_number == other.line_number
            && self.values == other.values
    }
}

impl Serialize for Particle {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Particle", 4)?;
        state.serialize_field("stream_name", self.stream_name())?;
        state.serialize_field("internal_timestamp", &self.internal_timestamp)?;
        state.serialize_field("line_number", &self.line_number)?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

/// One unit of work pulled from a parser
#[derive(Debug)]
pub enum ParseOutcome {
    Particle(Particle),
    Exception(RecoverableParseError),
}

/// Convert a DCL controller timestamp to NTP seconds
pub fn ntp_timestamp(timestamp: &NaiveDateTime) -> f64 {
    let utc = timestamp.and_utc();
    utc.timestamp() as f64
        + f64::from(utc.timestamp_subsec_millis()) / 1000.0
        + NTP_UNIX_EPOCH_OFFSET_SECS
}
