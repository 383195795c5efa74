//! Instrument frame validation
//!
//! Checks the field count and syntax of a classified full frame and converts it
//! into an owned, fully typed [`ValidatedFrame`]. Anything that passes here can
//! be turned into a particle without a further failure path.

use chrono::NaiveDateTime;

use super::classifier::{InstrumentFrame, InstrumentFrameType};
use super::error::RecoverableParseError;
use super::field_parsers::{
    FieldError, parse_checksum, parse_date_of_sample, parse_float, parse_int,
    parse_spectral_count, parse_time_of_sample,
};
use crate::app::models::ParticleValue;
use crate::constants::{
    FULL_FRAME_FIELD_COUNT, LAMP_TIME_SCALAR_INDEX, SCALAR_FIELD_NAMES, SPECTRAL_CHANNEL_COUNT,
};

const DATE_INDEX: usize = 1;
const TIME_INDEX: usize = 2;
const FIRST_SCALAR_INDEX: usize = 3;
const FIRST_CHANNEL_INDEX: usize = FIRST_SCALAR_INDEX + SCALAR_FIELD_NAMES.len();
const CHECKSUM_INDEX: usize = FIRST_CHANNEL_INDEX + SPECTRAL_CHANNEL_COUNT;

/// A full frame whose every field parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFrame {
    pub line_number: usize,
    pub dcl_timestamp: String,
    pub timestamp: NaiveDateTime,
    pub frame_type: InstrumentFrameType,
    pub serial_number: String,
    pub date_of_sample: i32,
    pub time_of_sample: f64,
    /// Values in [`SCALAR_FIELD_NAMES`] order
    pub scalars: Vec<ParticleValue>,
    pub spectral_channels: Vec<u32>,
    pub checksum: u8,
}

/// Validate an instrument frame
pub fn validate_frame(
    frame: &InstrumentFrame<'_>,
) -> std::result::Result<ValidatedFrame, RecoverableParseError> {
    if frame.fields.len() != FULL_FRAME_FIELD_COUNT {
        return Err(RecoverableParseError::FieldCount {
            line: frame.line_number,
            expected: FULL_FRAME_FIELD_COUNT,
            found: frame.fields.len(),
            raw: frame.raw.to_string(),
        });
    }

    parse_fields(frame).map_err(|error| RecoverableParseError::InvalidField {
        line: frame.line_number,
        field: error.field,
        value: error.value,
        raw: frame.raw.to_string(),
    })
}

fn parse_fields(frame: &InstrumentFrame<'_>) -> std::result::Result<ValidatedFrame, FieldError> {
    let fields = &frame.fields;

    let date_of_sample = parse_date_of_sample(fields[DATE_INDEX])?;
    let time_of_sample = parse_time_of_sample(fields[TIME_INDEX])?;

    let scalars = SCALAR_FIELD_NAMES
        .iter()
        .enumerate()
        .map(|(offset, name)| {
            let value = fields[FIRST_SCALAR_INDEX + offset];
            if offset == LAMP_TIME_SCALAR_INDEX {
                parse_int(name, value).map(ParticleValue::Int)
            } else {
                parse_float(name, value).map(ParticleValue::Float)
            }
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let spectral_channels = fields[FIRST_CHANNEL_INDEX..CHECKSUM_INDEX]
        .iter()
        .enumerate()
        .map(|(index, value)| parse_spectral_count(index, value))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let checksum = parse_checksum(fields[CHECKSUM_INDEX])?;

    Ok(ValidatedFrame {
        line_number: frame.line_number,
        dcl_timestamp: frame.stamp.text.to_string(),
        timestamp: frame.stamp.time,
        frame_type: frame.frame_type,
        serial_number: frame.serial_number.to_string(),
        date_of_sample,
        time_of_sample,
        scalars,
        spectral_channels,
        checksum,
    })
}
