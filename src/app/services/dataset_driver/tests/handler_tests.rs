//! Tests for the particle collector

use crate::app::models::{DataMode, Particle, ParticleKind, ParticleType};
use crate::app::services::dataset_driver::{JsonLinesWriter, ParticleCollector, ParticleDataHandler};

fn particle(kind: ParticleKind, line_number: usize) -> Particle {
    Particle::new(
        ParticleType::new(kind, DataMode::Telemetered),
        3_575_664_048.0,
        line_number,
        Vec::new(),
    )
}

fn publish<H: ParticleDataHandler>(mut handler: H, particle: Particle) {
    handler.add_particle_sample(particle.stream_name(), particle);
}

#[test]
fn test_collector_counts_streams() {
    let mut collector = ParticleCollector::new();
    publish(&mut collector, particle(ParticleKind::DarkInstrument, 9));
    publish(&mut collector, particle(ParticleKind::Instrument, 10));
    publish(&mut collector, particle(ParticleKind::Instrument, 11));

    assert_eq!(collector.particles().len(), 3);
    assert_eq!(
        collector.stream_counts().get("nutnr_b_dcl_full_instrument"),
        Some(&2)
    );
    assert_eq!(
        collector.stream_counts().get("nutnr_b_dcl_dark_full_instrument"),
        Some(&1)
    );
    assert!(!collector.capture_failed());
}

#[test]
fn test_collector_records_failures() {
    let mut collector = ParticleCollector::new();
    collector.set_particle_data_capture_failure();
    collector.set_particle_data_capture_failure();

    assert!(collector.capture_failed());
    assert_eq!(collector.failure_count(), 2);
    assert!(collector.into_particles().is_empty());
}

#[test]
fn test_json_lines_writer_one_object_per_line() {
    let mut writer = JsonLinesWriter::new(Vec::new());
    publish(&mut writer, particle(ParticleKind::Metadata, 9));
    publish(&mut writer, particle(ParticleKind::DarkInstrument, 9));
    writer.set_particle_data_capture_failure();

    assert_eq!(writer.written(), 2);
    assert_eq!(writer.failure_count(), 1);

    let bytes = writer.finish().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["stream_name"], "nutnr_b_dcl_full_metadata");
    assert_eq!(lines[1]["stream_name"], "nutnr_b_dcl_dark_full_instrument");
    assert_eq!(lines[1]["line_number"], 9);
}

struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_json_lines_writer_reports_first_error() {
    let mut writer = JsonLinesWriter::new(BrokenPipe);
    publish(&mut writer, particle(ParticleKind::Instrument, 10));
    publish(&mut writer, particle(ParticleKind::Instrument, 11));

    assert_eq!(writer.written(), 0);
    assert!(writer.finish().is_err());
}
