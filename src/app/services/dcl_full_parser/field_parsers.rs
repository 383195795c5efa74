//! Field parsing utilities for instrument frames
//!
//! Each helper parses one trimmed field and reports the field name and the
//! offending text on failure; the validator attaches line context.

use crate::constants::MAX_SPECTRAL_COUNT;

/// A field that failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub value: String,
}

impl FieldError {
    fn new(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Parse a finite floating point field
pub fn parse_float(field: &str, value: &str) -> FieldResult<f64> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(FieldError::new(field, trimmed)),
    }
}

/// Parse a signed integer field
pub fn parse_int(field: &str, value: &str) -> FieldResult<i64> {
    let trimmed = value.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| FieldError::new(field, trimmed))
}

/// Parse the sample date, encoded as YYYYDDD (year and day of year)
pub fn parse_date_of_sample(value: &str) -> FieldResult<i32> {
    let trimmed = value.trim();
    let invalid = || FieldError::new("date_of_sample", trimmed);

    if trimmed.len() != 7 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let date: i32 = trimmed.parse().map_err(|_| invalid())?;
    let year = date / 1000;
    let day = date % 1000;
    let days_in_year = if chrono::NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    };

    if !(1..=days_in_year).contains(&day) {
        return Err(invalid());
    }

    Ok(date)
}

/// Parse the sample time, encoded as decimal hours of the day
pub fn parse_time_of_sample(value: &str) -> FieldResult<f64> {
    let hours = parse_float("time_of_sample", value)?;
    if !(0.0..24.0).contains(&hours) {
        return Err(FieldError::new("time_of_sample", value.trim()));
    }
    Ok(hours)
}

/// Parse one spectrometer channel count
pub fn parse_spectral_count(index: usize, value: &str) -> FieldResult<u32> {
    let trimmed = value.trim();
    match trimmed.parse::<u32>() {
        Ok(count) if count <= MAX_SPECTRAL_COUNT => Ok(count),
        _ => Err(FieldError {
            field: format!("spectral_channels[{}]", index),
            value: trimmed.to_string(),
        }),
    }
}

/// Parse the frame checksum byte
pub fn parse_checksum(value: &str) -> FieldResult<u8> {
    let trimmed = value.trim();
    trimmed
        .parse::<u8>()
        .map_err(|_| FieldError::new("checksum", trimmed))
}
