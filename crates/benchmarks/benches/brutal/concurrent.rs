//! # Concurrent filter benchmarks
//!
//! Claims to validate:
//! - Adds from several threads need no lock
//! - Racing adds on shared keys still count each flipped bit once

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use salted_bloom::ConcurrentBloomFilter;
use salted_bloom_benchmarks::utils::generate_random_keys;
use std::time::Duration;

pub fn brutal_parallel_adds(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom/brutal/concurrent");
    group.measurement_time(Duration::from_secs(10));

    let keys = generate_random_keys(8_000);
    group.throughput(Throughput::Elements(keys.len() as u64));

    for threads in [1usize, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("parallel_add_8000", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let filter =
                        ConcurrentBloomFilter::new_with_fpr(8_000, 0.01).expect("valid parameters");
                    let chunk = keys.len() / threads;
                    std::thread::scope(|scope| {
                        for part in keys.chunks(chunk) {
                            let f = &filter;
                            scope.spawn(move || f.add_all(part));
                        }
                    });
                    black_box(filter.flipped_bits())
                });
            },
        );
    }

    // Every thread adds the same keys: maximal contention on each word
    group.bench_function("contended_add_shared_keys", |b| {
        let shared = &keys[..1_000];
        b.iter(|| {
            let filter = ConcurrentBloomFilter::new_with_fpr(1_000, 0.01).expect("valid parameters");
            std::thread::scope(|scope| {
                for _ in 0..4 {
                    let f = &filter;
                    scope.spawn(move || f.add_all(shared));
                }
            });
            black_box(filter.flipped_bits())
        });
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    brutal_parallel_adds(c);
}
