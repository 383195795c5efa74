//! Recoverable per-frame parsing failures

use thiserror::Error;

/// A malformed record that was skipped
///
/// Raising one never terminates a parse; the parser reports it and resumes at
/// the next line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecoverableParseError {
    #[error("line {line}: unrecognized record: {raw}")]
    UnrecognizedRecord { line: usize, raw: String },

    #[error("line {line}: invalid frame type '{frame_type}'")]
    InvalidFrameType {
        line: usize,
        frame_type: String,
        raw: String,
    },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
        raw: String,
    },

    #[error("line {line}: invalid value '{value}' for field '{field}'")]
    InvalidField {
        line: usize,
        field: String,
        value: String,
        raw: String,
    },
}

impl RecoverableParseError {
    /// 1-based line of the offending record
    pub fn line(&self) -> usize {
        match self {
            Self::UnrecognizedRecord { line, .. }
            | Self::InvalidFrameType { line, .. }
            | Self::FieldCount { line, .. }
            | Self::InvalidField { line, .. } => *line,
        }
    }

    /// The offending record as read
    pub fn raw(&self) -> &str {
        match self {
            Self::UnrecognizedRecord { raw, .. }
            | Self::InvalidFrameType { raw, .. }
            | Self::FieldCount { raw, .. }
            | Self::InvalidField { raw, .. } => raw,
        }
    }

    /// Short category name for reports
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnrecognizedRecord { .. } => "unrecognized_record",
            Self::InvalidFrameType { .. } => "invalid_frame_type",
            Self::FieldCount { .. } => "field_count",
            Self::InvalidField { .. } => "invalid_field",
        }
    }
}
