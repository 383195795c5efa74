//! Tests for scan statistics

use crate::app::services::dcl_full_parser::ScanStats;

#[test]
fn test_scan_stats_empty() {
    let stats = ScanStats::new();
    assert_eq!(stats.units(), 0);
    assert_eq!(stats.success_rate(), 0.0);
}

#[test]
fn test_scan_stats_units_and_rate() {
    let stats = ScanStats {
        particles_produced: 2,
        exceptions: 2,
        ..ScanStats::default()
    };
    assert_eq!(stats.units(), 4);
    assert_eq!(stats.success_rate(), 50.0);
}

#[test]
fn test_scan_stats_merge() {
    let mut total = ScanStats {
        lines_read: 10,
        particles_produced: 3,
        ..ScanStats::default()
    };
    let other = ScanStats {
        lines_read: 5,
        exceptions: 1,
        blocks_started: 1,
        dark_resyncs: 1,
        ..ScanStats::default()
    };

    total.merge(&other);

    assert_eq!(total.lines_read, 15);
    assert_eq!(total.units(), 4);
    assert_eq!(total.blocks_started, 1);
    assert_eq!(total.dark_resyncs, 1);
}
