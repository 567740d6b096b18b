//! # Single-threaded filter benchmarks
//!
//! Claims to validate:
//! - Add: k MD5 digests + k test-and-set operations
//! - Contains: at most k digests, fewer on a miss
//! - Derivation: a handful of float operations
//! - Clear: O(m/8) byte writes

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use salted_bloom::domain::calculate_optimal_parameters;
use salted_bloom::BloomFilter;
use salted_bloom_benchmarks::utils::{generate_random_keys, generate_sequential_keys};
use std::time::Duration;

pub fn brutal_add_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom/brutal/add");
    group.measurement_time(Duration::from_secs(10));

    // Cost grows linearly with hash rounds
    for k in [1usize, 3, 6, 10, 16] {
        group.bench_with_input(BenchmarkId::new("single_add", k), &k, |b, &k| {
            let mut filter = BloomFilter::new(95_850, k).expect("valid parameters");
            b.iter(|| filter.add(black_box("0xABCD1234567890")));
        });
    }

    let keys = generate_sequential_keys(10_000);
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("bulk_add_10000_sequential", |b| {
        b.iter(|| {
            let mut filter = BloomFilter::new_with_fpr(10_000, 0.01).expect("valid parameters");
            filter.add_all(black_box(&keys));
            black_box(filter.flipped_bits())
        });
    });

    group.finish();
}

pub fn brutal_contains_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom/brutal/contains");
    group.measurement_time(Duration::from_secs(10));

    let keys = generate_random_keys(10_000);
    let mut filter = BloomFilter::new_with_fpr(10_000, 0.01).expect("valid parameters");
    filter.add_all(&keys);

    group.bench_function("contains_existing_key", |b| {
        let target = &keys[5_000];
        b.iter(|| black_box(filter.contains(black_box(target))))
    });

    // Misses usually stop after the first round
    group.bench_function("contains_missing_key", |b| {
        b.iter(|| black_box(filter.contains(black_box("definitely-not-present"))))
    });

    let probes = generate_random_keys(10_000);
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("bulk_contains_10000", |b| {
        b.iter(|| {
            let matches = probes.iter().filter(|key| filter.contains(key)).count();
            black_box(matches)
        });
    });

    group.finish();
}

pub fn brutal_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom/brutal/derivation");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("optimal_params", |b| {
        b.iter(|| calculate_optimal_parameters(black_box(10_000), black_box(0.01)))
    });

    for capacity in [1_024usize, 95_850, 1_000_000] {
        group.throughput(Throughput::Bytes(capacity as u64 / 8));
        group.bench_with_input(BenchmarkId::new("clear", capacity), &capacity, |b, &m| {
            let mut filter = BloomFilter::new(m, 6).expect("valid parameters");
            b.iter(|| {
                filter.add("x");
                filter.clear();
            });
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    brutal_add_operations(c);
    brutal_contains_operations(c);
    brutal_derivation(c);
}
