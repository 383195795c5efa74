//! Test utilities for DCL full-frame parser testing
//!
//! Builders for DCL log lines and full instrument frames shared by the test
//! modules below.

use crate::constants::SPECTRAL_CHANNEL_COUNT;

mod metadata_tests;
mod stats_tests;

pub const SERIAL: &str = "0187";

/// Prefix a payload with a DCL controller timestamp
pub fn dcl(stamp: &str, payload: &str) -> String {
    format!("{} {}", stamp, payload)
}

/// Fields of a well-formed full frame, header included
pub fn frame_fields(frame_type: &str, seq: u32) -> Vec<String> {
    let mut fields = vec![
        format!("SAT{}{}", frame_type, SERIAL),
        "2013114".to_string(),
        format!("{:.6}", 0.015 + f64::from(seq) * 0.0003),
        format!("{:.2}", 12.35 + f64::from(seq) * 0.11),
        "0.0175".to_string(),
        "-0.0016".to_string(),
        "0.1023".to_string(),
        "0.000114".to_string(),
        "13.24".to_string(),
        "12.93".to_string(),
        "14.10".to_string(),
        format!("{}", 63477 + seq * 2),
        "11.7".to_string(),
        "11.85".to_string(),
        "4.97".to_string(),
        "11.93".to_string(),
        "22137.40".to_string(),
        "11.45".to_string(),
        "8.60".to_string(),
        "9013.55".to_string(),
    ];
    fields.extend((0..SPECTRAL_CHANNEL_COUNT as u32).map(|i| (8000 + (i * 37 + seq) % 4000).to_string()));
    fields.push("201".to_string());
    fields
}

/// A complete, well-formed frame line
pub fn frame_line(stamp: &str, frame_type: &str, seq: u32) -> String {
    dcl(stamp, &frame_fields(frame_type, seq).join(","))
}

/// A frame line with one field replaced
pub fn frame_line_with(stamp: &str, frame_type: &str, index: usize, value: &str) -> String {
    let mut fields = frame_fields(frame_type, 0);
    fields[index] = value.to_string();
    dcl(stamp, &fields.join(","))
}

/// Block opening and full console header
pub fn block_header(stamp_prefix: &str) -> Vec<String> {
    vec![
        dcl(&format!("{}:00.000", stamp_prefix), "[nutnr:DLOGP6]:Idle state, without initialize"),
        dcl(&format!("{}:01.000", stamp_prefix), "[nutnr:DLOGP6]:Instrument started"),
        dcl(&format!("{}:01.051", stamp_prefix), "ISUS Ver 2.9.6 (Jun  4 2012 08:47:31)"),
        dcl(&format!("{}:01.097", stamp_prefix), "Turning ON Spectrometer."),
        dcl(&format!("{}:06.109", stamp_prefix), "Spectrometer powered up."),
        dcl(&format!("{}:06.140", stamp_prefix), "Turning ON UV light source."),
        dcl(&format!("{}:07.164", stamp_prefix), "UV light source powered up."),
        dcl(&format!("{}:07.182", stamp_prefix), "Data log file is 'DATA\\SCH13114.DAT'."),
    ]
}

/// Join lines into log content
pub fn log_content(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    content.push('\n');
    content
}
