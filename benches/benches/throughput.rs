//! Photon Throughput Benchmarks
//!
//! Statistically rigorous measurements across input sizes and operations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use photon_benches::random_buffer;
use std::hint::black_box;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

// =============================================================================
// BENCHMARK 1: LATENCY
// =============================================================================

/// Hot-path latency for small inputs (hash map keys, identifiers).
fn bench_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Latency");

    for (size, name) in [(8, "8B"), (16, "16B"), (64, "64B"), (256, "256B"), (KB, "1KB")] {
        let input = random_buffer(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| photon::hash(black_box(data)))
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: BULK HASHING
// =============================================================================

/// Sustained throughput for file-sized inputs.
fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Bulk");
    group.sample_size(20);

    for (size, name) in [
        (64 * KB, "64KB"),
        (MB, "1MB"),
        (16 * MB, "16MB"),
        (64 * MB, "64MB"),
    ] {
        let input = random_buffer(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| photon::hash(black_box(data)))
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 3: STREAMING
// =============================================================================

/// Incremental hashing in 128 KB updates.
fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("3-Streaming");
    group.sample_size(20);

    let input = random_buffer(16 * MB);
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("16MB-by-128KB", |b| {
        b.iter(|| {
            let mut hasher = photon::Hasher::new();
            for chunk in input.chunks(128 * KB) {
                hasher.update(black_box(chunk));
            }
            hasher.finish()
        })
    });
    group.finish();
}

// =============================================================================
// BENCHMARK 4: CHECKSUM & GENERATOR
// =============================================================================

fn bench_bytesum(c: &mut Criterion) {
    let mut group = c.benchmark_group("4-Bytesum");
    group.sample_size(20);

    for (size, name) in [(KB, "1KB"), (MB, "1MB"), (16 * MB, "16MB")] {
        let input = random_buffer(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| photon::bytesum(black_box(data)))
        });
    }
    group.finish();
}

fn bench_fill_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("5-Generator");

    for (size, name) in [(64, "64B"), (4 * KB, "4KB"), (MB, "1MB")] {
        let mut buffer = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &size, |b, _| {
            b.iter(|| photon::fill_random(black_box(&mut buffer), 42))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_latency,
    bench_bulk,
    bench_streaming,
    bench_bytesum,
    bench_fill_random
);
criterion_main!(benches);
