//! Particle construction
//!
//! Maps validated frames and completed block headers to particles. The concrete
//! particle type is the cross product of the record kind and the parser's
//! delivery mode; decoding itself never depends on the mode.

use super::classifier::InstrumentFrameType;
use super::metadata::BlockMetadata;
use super::validator::ValidatedFrame;
use crate::app::models::{
    DataMode, Particle, ParticleKind, ParticleType, ParticleValue, ParticleValueEntry,
    ntp_timestamp,
};
use crate::constants::{FRAME_HEADER_PREFIX, SCALAR_FIELD_NAMES};

fn entry(value_id: &str, value: ParticleValue) -> ParticleValueEntry {
    ParticleValueEntry {
        value_id: value_id.to_string(),
        value,
    }
}

fn text(value: &str) -> ParticleValue {
    ParticleValue::Text(value.to_string())
}

/// Build the particle for a light or dark frame
pub fn build_instrument_particle(frame: &ValidatedFrame, mode: DataMode) -> Particle {
    let kind = match frame.frame_type {
        InstrumentFrameType::Light => ParticleKind::Instrument,
        InstrumentFrameType::Dark => ParticleKind::DarkInstrument,
    };

    let mut values = Vec::with_capacity(SCALAR_FIELD_NAMES.len() + 8);
    values.push(entry("dcl_controller_timestamp", text(&frame.dcl_timestamp)));
    values.push(entry("frame_header", text(FRAME_HEADER_PREFIX)));
    values.push(entry("frame_type", text(frame.frame_type.code())));
    values.push(entry("serial_number", text(&frame.serial_number)));
    values.push(entry(
        "date_of_sample",
        ParticleValue::Int(i64::from(frame.date_of_sample)),
    ));
    values.push(entry(
        "time_of_sample",
        ParticleValue::Float(frame.time_of_sample),
    ));
    values.extend(
        SCALAR_FIELD_NAMES
            .iter()
            .zip(&frame.scalars)
            .map(|(name, value)| entry(name, value.clone())),
    );
    values.push(entry(
        "spectral_channels",
        ParticleValue::IntArray(frame.spectral_channels.clone()),
    ));
    values.push(entry("checksum", ParticleValue::Int(i64::from(frame.checksum))));

    Particle::new(
        ParticleType::new(kind, mode),
        ntp_timestamp(&frame.timestamp),
        frame.line_number,
        values,
    )
}

/// Build the metadata particle for a block header
///
/// `closing_frame` is the dark frame whose arrival completed the header.
pub fn build_metadata_particle(
    metadata: &BlockMetadata,
    closing_frame: &ValidatedFrame,
    mode: DataMode,
) -> Particle {
    let values = vec![
        entry(
            "dcl_controller_start_timestamp",
            text(&metadata.dcl_controller_start_timestamp),
        ),
        entry(
            "dcl_controller_end_timestamp",
            text(&closing_frame.dcl_timestamp),
        ),
        entry(
            "startup_time",
            ParticleValue::Float(ntp_timestamp(&metadata.startup_time)),
        ),
        entry("firmware_version", text(&metadata.firmware_version)),
        entry("firmware_date", text(&metadata.firmware_date)),
        entry(
            "spec_on_time",
            ParticleValue::Float(ntp_timestamp(&metadata.spec_on_time)),
        ),
        entry(
            "spec_powered_time",
            ParticleValue::Float(ntp_timestamp(&metadata.spec_powered_time)),
        ),
        entry(
            "lamp_on_time",
            ParticleValue::Float(ntp_timestamp(&metadata.lamp_on_time)),
        ),
        entry(
            "lamp_powered_time",
            ParticleValue::Float(ntp_timestamp(&metadata.lamp_powered_time)),
        ),
        entry("nutnr_data_log_file", text(&metadata.data_log_file)),
        entry("serial_number", text(&closing_frame.serial_number)),
    ];

    Particle::new(
        ParticleType::new(ParticleKind::Metadata, mode),
        ntp_timestamp(&metadata.startup_time),
        closing_frame.line_number,
        values,
    )
}
