//! Line classification for DCL full-frame logs
//!
//! Every line is tagged as a DCL status message, an instrument metadata
//! message, a light or dark instrument frame, or an invalid record. The
//! classifier only looks at markers; field level checks belong to the
//! [`validator`](super::validator).

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

use super::error::RecoverableParseError;
use crate::constants::{
    DARK_FRAME_TYPE, DCL_TIMESTAMP_FORMAT, FRAME_HEADER_PREFIX, LIGHT_FRAME_TYPE,
};

static DCL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}\.\d{3}) (.*)$")
        .expect("DCL line pattern is valid")
});

static DCL_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^:\]]+):([^\]]+)\]:(.*)$").expect("DCL status pattern is valid")
});

static FIRMWARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ISUS Ver (\S+) \((.+)\)$").expect("firmware pattern is valid")
});

static DATA_LOG_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Data log file is '(.+)'\.$").expect("data log file pattern is valid")
});

static FRAME_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^SAT([A-Z]{3})([A-Za-z0-9]{4})$").expect("frame header pattern is valid")
});

/// DCL controller timestamp, as logged and as parsed
#[derive(Debug, Clone, PartialEq)]
pub struct DclStamp<'a> {
    pub text: &'a str,
    pub time: NaiveDateTime,
}

/// Instrument console messages that make up a block header
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataRecord {
    Firmware { version: String, date: String },
    SpectrometerOn,
    SpectrometerPowered,
    LampOn,
    LampPowered,
    DataLogFile(String),
}

/// Light or dark full frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentFrameType {
    Light,
    Dark,
}

impl InstrumentFrameType {
    pub fn code(&self) -> &'static str {
        match self {
            InstrumentFrameType::Light => LIGHT_FRAME_TYPE,
            InstrumentFrameType::Dark => DARK_FRAME_TYPE,
        }
    }
}

/// An instrument frame with a recognised header, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentFrame<'a> {
    pub line_number: usize,
    pub stamp: DclStamp<'a>,
    pub frame_type: InstrumentFrameType,
    pub serial_number: &'a str,
    /// All comma separated fields, header included
    pub fields: Vec<&'a str>,
    pub raw: &'a str,
}

/// Classification of one log line
#[derive(Debug, Clone, PartialEq)]
pub enum Frame<'a> {
    Blank,
    Status {
        stamp: DclStamp<'a>,
        message: &'a str,
    },
    Metadata {
        stamp: DclStamp<'a>,
        record: MetadataRecord,
    },
    Instrument(InstrumentFrame<'a>),
    Invalid(RecoverableParseError),
}

/// Classify a single line (without its line terminator)
pub fn classify_line(line_number: usize, line: &str) -> Frame<'_> {
    let raw = line.trim_end();
    if raw.trim().is_empty() {
        return Frame::Blank;
    }

    let Some(captures) = DCL_LINE.captures(raw) else {
        return Frame::Invalid(RecoverableParseError::UnrecognizedRecord {
            line: line_number,
            raw: raw.to_string(),
        });
    };

    let (Some(stamp_text), Some(payload)) = (captures.get(1), captures.get(2)) else {
        return Frame::Invalid(RecoverableParseError::UnrecognizedRecord {
            line: line_number,
            raw: raw.to_string(),
        });
    };
    let stamp_text = stamp_text.as_str();
    let payload = payload.as_str();

    let time = match NaiveDateTime::parse_from_str(stamp_text, DCL_TIMESTAMP_FORMAT) {
        Ok(time) => time,
        Err(_) => {
            return Frame::Invalid(RecoverableParseError::InvalidField {
                line: line_number,
                field: "dcl_controller_timestamp".to_string(),
                value: stamp_text.to_string(),
                raw: raw.to_string(),
            });
        }
    };
    let stamp = DclStamp {
        text: stamp_text,
        time,
    };

    if let Some(status) = DCL_STATUS.captures(payload) {
        let message = status.get(3).map_or("", |m| m.as_str());
        return Frame::Status { stamp, message };
    }

    if payload.starts_with(FRAME_HEADER_PREFIX) {
        return classify_instrument_frame(line_number, stamp, payload, raw);
    }

    match classify_metadata(payload) {
        Some(record) => Frame::Metadata { stamp, record },
        None => Frame::Invalid(RecoverableParseError::UnrecognizedRecord {
            line: line_number,
            raw: raw.to_string(),
        }),
    }
}

fn classify_instrument_frame<'a>(
    line_number: usize,
    stamp: DclStamp<'a>,
    payload: &'a str,
    raw: &'a str,
) -> Frame<'a> {
    let fields: Vec<&str> = payload.split(',').collect();
    let header = fields[0].trim();

    let Some(captures) = FRAME_HEADER.captures(header) else {
        return Frame::Invalid(RecoverableParseError::InvalidField {
            line: line_number,
            field: "frame_header".to_string(),
            value: header.to_string(),
            raw: raw.to_string(),
        });
    };

    let type_code = captures.get(1).map_or("", |m| m.as_str());
    let frame_type = match type_code {
        DARK_FRAME_TYPE => InstrumentFrameType::Dark,
        LIGHT_FRAME_TYPE => InstrumentFrameType::Light,
        other => {
            return Frame::Invalid(RecoverableParseError::InvalidFrameType {
                line: line_number,
                frame_type: other.to_string(),
                raw: raw.to_string(),
            });
        }
    };

    let serial_number = captures.get(2).map_or("", |m| m.as_str());

    Frame::Instrument(InstrumentFrame {
        line_number,
        stamp,
        frame_type,
        serial_number,
        fields,
        raw,
    })
}

fn classify_metadata(payload: &str) -> Option<MetadataRecord> {
    match payload.trim() {
        "Turning ON Spectrometer." => return Some(MetadataRecord::SpectrometerOn),
        "Spectrometer powered up." => return Some(MetadataRecord::SpectrometerPowered),
        "Turning ON UV light source." => return Some(MetadataRecord::LampOn),
        "UV light source powered up." => return Some(MetadataRecord::LampPowered),
        _ => {}
    }

    if let Some(captures) = FIRMWARE.captures(payload.trim()) {
        return Some(MetadataRecord::Firmware {
            version: captures.get(1)?.as_str().to_string(),
            date: captures.get(2)?.as_str().to_string(),
        });
    }

    DATA_LOG_FILE
        .captures(payload.trim())
        .and_then(|captures| captures.get(1))
        .map(|name| MetadataRecord::DataLogFile(name.as_str().to_string()))
}
