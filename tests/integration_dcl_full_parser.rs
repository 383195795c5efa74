//! Integration tests for the DCL full-frame parser with recorded log files
//!
//! Each log under `tests/resources` exercises one scenario: clean multi-block
//! files, malformed fields, unknown frame types, incomplete headers, repeated
//! dark frames and a file with no frames at all. Every scenario is checked in
//! both delivery modes.

use nutnr_processor::app::services::dataset_driver::{
    DriverContext, ParticleCollector, parse_recovered, parse_telemetered,
};
use nutnr_processor::app::services::exception_sink::ExceptionRecorder;
use nutnr_processor::{DataMode, DclFullParser, Error, Particle, ParticleKind, ParticleValue};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const NTP_OFFSET: f64 = 2_208_988_800.0;

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join(format!("{}.nutnr_b_dcl_full.log", name))
}

/// Parse a whole resource file in one `get_records` call
fn parse_all(name: &str, mode: DataMode) -> (Vec<Particle>, ExceptionRecorder) {
    let file = File::open(resource(name)).expect("resource file should exist");
    let mut exceptions = ExceptionRecorder::new();
    let particles = {
        let mut parser = DclFullParser::new(mode, BufReader::new(file), &mut exceptions);
        let particles = parser.get_records(10_000).unwrap();
        assert!(parser.is_exhausted());
        particles
    };
    (particles, exceptions)
}

fn kinds(particles: &[Particle]) -> Vec<ParticleKind> {
    particles.iter().map(Particle::kind).collect()
}

fn count(particles: &[Particle], kind: ParticleKind) -> usize {
    particles.iter().filter(|p| p.kind() == kind).count()
}

fn text<'a>(particle: &'a Particle, value_id: &str) -> &'a str {
    particle
        .value(value_id)
        .and_then(ParticleValue::as_str)
        .unwrap_or_else(|| panic!("{} should be a text value", value_id))
}

#[test]
fn test_happy_path_two_blocks() {
    for mode in DataMode::ALL {
        let (particles, exceptions) = parse_all("20130424", mode);

        assert_eq!(particles.len(), 26, "mode {}", mode);
        assert_eq!(exceptions.count(), 0);
        assert_eq!(count(&particles, ParticleKind::Metadata), 2);
        assert_eq!(count(&particles, ParticleKind::DarkInstrument), 2);
        assert_eq!(count(&particles, ParticleKind::Instrument), 22);

        // Metadata always directly precedes its block's dark frame
        for (index, particle) in particles.iter().enumerate() {
            if particle.kind() == ParticleKind::Metadata {
                assert_eq!(particles[index + 1].kind(), ParticleKind::DarkInstrument);
                assert_eq!(particles[index + 1].line_number, particle.line_number);
            }
        }
    }
}

#[test]
fn test_happy_path_first_block_values() {
    let (particles, _) = parse_all("20130424", DataMode::Recovered);

    let metadata = &particles[0];
    assert_eq!(metadata.stream_name(), "nutnr_b_dcl_full_metadata_recovered");
    assert_eq!(metadata.line_number, 12);
    assert_eq!(
        text(metadata, "dcl_controller_start_timestamp"),
        "2013/04/24 00:00:48.052"
    );
    assert_eq!(
        text(metadata, "dcl_controller_end_timestamp"),
        "2013/04/24 00:00:55.334"
    );
    assert_eq!(text(metadata, "firmware_version"), "2.9.6");
    assert_eq!(text(metadata, "firmware_date"), "Jun  4 2012 08:47:31");
    assert_eq!(text(metadata, "nutnr_data_log_file"), "DATA\\SCH13114.DAT");
    assert_eq!(text(metadata, "serial_number"), "0187");

    // 2013-04-24T00:00:48.052Z in NTP seconds
    let startup = 1_366_761_648.052 + NTP_OFFSET;
    assert!((metadata.internal_timestamp - startup).abs() < 1e-3);

    let dark = &particles[1];
    assert_eq!(dark.stream_name(), "nutnr_b_dcl_dark_full_instrument_recovered");
    assert_eq!(text(dark, "frame_type"), "NDF");
    assert_eq!(text(dark, "frame_header"), "SAT");
    assert_eq!(
        dark.value("date_of_sample").and_then(ParticleValue::as_i64),
        Some(2013114)
    );
    assert!((dark.internal_timestamp - (startup + 7.282)).abs() < 1e-3);
    let channels = dark
        .value("spectral_channels")
        .and_then(ParticleValue::as_array)
        .unwrap();
    assert_eq!(channels.len(), 256);

    let light = &particles[2];
    assert_eq!(light.stream_name(), "nutnr_b_dcl_full_instrument_recovered");
    assert_eq!(text(light, "frame_type"), "NLF");
    assert!(light.line_number > dark.line_number);
}

#[test]
fn test_happy_path_three_blocks() {
    for mode in DataMode::ALL {
        let (particles, exceptions) = parse_all("20031129", mode);

        assert_eq!(particles.len(), 42);
        assert!(exceptions.is_empty());
        assert_eq!(count(&particles, ParticleKind::Metadata), 3);
        assert_eq!(count(&particles, ParticleKind::DarkInstrument), 3);

        let log_files: Vec<&str> = particles
            .iter()
            .filter(|p| p.kind() == ParticleKind::Metadata)
            .map(|p| text(p, "nutnr_data_log_file"))
            .collect();
        assert!(log_files.iter().all(|name| *name == "DATA\\SCH03333.DAT"));
    }
}

#[test]
fn test_invalid_fields() {
    for mode in DataMode::ALL {
        let (particles, exceptions) = parse_all("19970401", mode);

        assert_eq!(particles.len(), 2);
        assert_eq!(kinds(&particles), vec![ParticleKind::Metadata, ParticleKind::DarkInstrument]);
        assert_eq!(exceptions.count(), 100);

        // Exceptions arrive in source order
        let lines: Vec<usize> = exceptions.history().iter().map(|e| e.line()).collect();
        assert!(lines.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(
            exceptions
                .history()
                .iter()
                .all(|e| matches!(e.category(), "invalid_field" | "field_count"))
        );
    }
}

#[test]
fn test_invalid_frame_types() {
    for mode in DataMode::ALL {
        let (particles, exceptions) = parse_all("19990401", mode);

        // No dark frame, so no metadata particle
        assert_eq!(kinds(&particles), vec![ParticleKind::Instrument; 3]);
        let lines: Vec<usize> = particles.iter().map(|p| p.line_number).collect();
        assert_eq!(lines, vec![13, 15, 18]);

        assert_eq!(exceptions.count(), 4);
        assert!(
            exceptions
                .history()
                .iter()
                .all(|e| e.category() == "invalid_frame_type")
        );
        let error_lines: Vec<usize> = exceptions.history().iter().map(|e| e.line()).collect();
        assert_eq!(error_lines, vec![12, 14, 16, 17]);
    }
}

#[test]
fn test_missing_metadata_lines() {
    for mode in DataMode::ALL {
        let (particles, exceptions) = parse_all("19980401", mode);

        assert_eq!(particles.len(), 4);
        assert_eq!(count(&particles, ParticleKind::Metadata), 0);
        assert_eq!(count(&particles, ParticleKind::DarkInstrument), 1);
        assert_eq!(exceptions.count(), 3);

        let error_lines: Vec<usize> = exceptions.history().iter().map(|e| e.line()).collect();
        assert!(error_lines.contains(&12));
        assert!(error_lines.contains(&15));
    }
}

#[test]
fn test_second_dark_frame_starts_new_data_block() {
    for mode in DataMode::ALL {
        let file = File::open(resource("20040901")).unwrap();
        let mut exceptions = ExceptionRecorder::new();
        let mut parser = DclFullParser::new(mode, BufReader::new(file), &mut exceptions);
        let particles = parser.get_records(100).unwrap();

        assert_eq!(
            kinds(&particles),
            vec![
                ParticleKind::Metadata,
                ParticleKind::DarkInstrument,
                ParticleKind::DarkInstrument,
                ParticleKind::Instrument,
            ]
        );
        assert_eq!(particles[0].line_number, 12);
        assert_eq!(parser.stats().dark_resyncs, 1);
        drop(parser);
        assert!(exceptions.is_empty());
    }
}

#[test]
fn test_no_particles() {
    for mode in DataMode::ALL {
        let (particles, exceptions) = parse_all("20010101", mode);
        assert!(particles.is_empty());
        assert!(exceptions.is_empty());
    }
}

#[test]
fn test_incremental_get_records_matches_single_call() {
    let (expected, _) = parse_all("19970401", DataMode::Telemetered);

    let file = File::open(resource("19970401")).unwrap();
    let mut exceptions = ExceptionRecorder::new();
    let mut parser = DclFullParser::telemetered(BufReader::new(file), &mut exceptions);

    let mut particles = Vec::new();
    let mut calls = 0;
    while !parser.is_exhausted() {
        particles.extend(parser.get_records(3).unwrap());
        calls += 1;
    }

    assert_eq!(particles, expected);
    // 102 units in batches of three, plus the call that finds end of input
    assert!(calls >= 34);
    drop(parser);
    assert_eq!(exceptions.count(), 100);
}

#[test]
fn test_modes_differ_only_in_stream_names() {
    for name in ["20130424", "20031129", "19970401", "19980401", "19990401", "20040901"] {
        let (recovered, rec_exceptions) = parse_all(name, DataMode::Recovered);
        let (telemetered, tel_exceptions) = parse_all(name, DataMode::Telemetered);

        assert_eq!(recovered.len(), telemetered.len(), "{}", name);
        assert_eq!(rec_exceptions.history(), tel_exceptions.history(), "{}", name);
        for (rec, tel) in recovered.iter().zip(&telemetered) {
            assert!(rec.same_content(tel), "{} line {}", name, rec.line_number);
            assert!(rec.stream_name().ends_with("_recovered"));
            assert!(!tel.stream_name().ends_with("_recovered"));
        }
    }
}

#[test]
fn test_driver_entry_points() {
    let context = DriverContext::labelled("integration");

    let recovered = parse_recovered(&context, &resource("20130424"), ParticleCollector::new()).unwrap();
    assert_eq!(recovered.particles().len(), 26);
    assert!(!recovered.capture_failed());
    assert_eq!(
        recovered
            .stream_counts()
            .get("nutnr_b_dcl_full_metadata_recovered"),
        Some(&2)
    );

    let telemetered =
        parse_telemetered(&context, &resource("19990401"), ParticleCollector::new()).unwrap();
    assert_eq!(telemetered.particles().len(), 3);
    assert_eq!(telemetered.failure_count(), 4);
}

#[test]
fn test_driver_missing_file() {
    let result = parse_telemetered(
        &DriverContext::default(),
        &resource("18000101"),
        ParticleCollector::new(),
    );
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}
