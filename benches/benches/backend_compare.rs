//! Backend Comparison Benchmarks
//!
//! Dispatched kernel against the portable reference, to quantify what the
//! SIMD backends buy on this machine. The outputs are asserted equal first —
//! a fast wrong kernel is not a benchmark result.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use photon::kernels::portable;
use photon_benches::random_buffer;
use std::hint::black_box;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

fn bench_hash_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hash-Backends");
    group.sample_size(20);

    println!("Active backend: {}", photon::active_backend());

    for (size, name) in [(64, "64B"), (4 * KB, "4KB"), (MB, "1MB")] {
        let input = random_buffer(size);
        assert_eq!(photon::hash(&input), portable::hash(&input, 0));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("dispatched", name), &input, |b, data| {
            b.iter(|| photon::hash(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("portable", name), &input, |b, data| {
            b.iter(|| portable::hash(black_box(data), 0))
        });
    }
    group.finish();
}

fn bench_bytesum_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bytesum-Backends");
    group.sample_size(20);

    for (size, name) in [(4 * KB, "4KB"), (4 * MB, "4MB")] {
        let input = random_buffer(size);
        assert_eq!(photon::bytesum(&input), portable::bytesum(&input));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("dispatched", name), &input, |b, data| {
            b.iter(|| photon::bytesum(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("portable", name), &input, |b, data| {
            b.iter(|| portable::bytesum(black_box(data)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hash_backends, bench_bytesum_backends);
criterion_main!(benches);
