//! Parser throughput benchmarks
//!
//! Parses recorded logs repeated in memory, once per delivery mode.
//!
//! Run with: cargo bench --bench parser_throughput

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nutnr_processor::app::services::dataset_driver::{
    DriverContext, ParticleCollector, SimpleDatasetDriver,
};
use nutnr_processor::app::services::exception_sink::ExceptionRecorder;
use nutnr_processor::{DataMode, DclFullParser};
use std::hint::black_box;

const CLEAN_LOG: &str = include_str!("../tests/resources/20130424.nutnr_b_dcl_full.log");
const MALFORMED_LOG: &str = include_str!("../tests/resources/19970401.nutnr_b_dcl_full.log");

fn repeated(log: &str, copies: usize) -> String {
    log.repeat(copies)
}

fn bench_get_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_records");

    for (name, log) in [("clean", CLEAN_LOG), ("malformed", MALFORMED_LOG)] {
        let content = repeated(log, 20);
        group.throughput(Throughput::Bytes(content.len() as u64));

        for mode in DataMode::ALL {
            group.bench_with_input(
                BenchmarkId::new(name, mode),
                content.as_bytes(),
                |b, bytes| {
                    b.iter(|| {
                        let mut exceptions = ExceptionRecorder::new();
                        let mut parser = DclFullParser::new(mode, bytes, &mut exceptions);
                        let particles = parser.get_records(usize::MAX).unwrap_or_default();
                        black_box(particles.len())
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_driver(c: &mut Criterion) {
    let content = repeated(CLEAN_LOG, 20);
    let mut group = c.benchmark_group("driver");
    group.throughput(Throughput::Bytes(content.len() as u64));

    for batch_size in [1, 64, 1024] {
        group.bench_with_input(
            BenchmarkId::new("batch_size", batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    let mut driver = SimpleDatasetDriver::new(
                        DriverContext::default(),
                        DataMode::Recovered,
                        ParticleCollector::new(),
                    )
                    .with_batch_size(batch_size);
                    let stats = driver.process_file_stream(content.as_bytes());
                    black_box(stats.map(|s| s.particles_produced).unwrap_or_default())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_get_records, bench_driver);
criterion_main!(benches);
