mod common;

use std::time::{Duration, Instant};

use brute_keyspace::{Alphabet, BruteForce, Keyspace, enumerate};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_enumerate(c: &mut Criterion) {
    let alphabet = Alphabet::lowercase();
    let mut group = c.benchmark_group("enumerate_lowercase");

    for length in 1..=3 {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| black_box(enumerate(&alphabet, length).unwrap()))
        });
    }

    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let alphabet = Alphabet::lowercase();
    let keyspace = Keyspace::new(&alphabet, 3).unwrap();

    c.bench_function("stream_lowercase_3", |b| {
        b.iter(|| {
            for candidate in keyspace.candidates() {
                black_box(candidate);
            }
        })
    });
}

/// Worst case scan: the secret is the last candidate.
fn bench_full_scan(c: &mut Criterion) {
    let alphabet = Alphabet::lowercase();
    let sequence = enumerate(&alphabet, 3).unwrap();
    let searcher = BruteForce::new();

    c.bench_function("scan_lowercase_3_last", |b| {
        b.iter(|| black_box(searcher.run(&sequence, black_box("zzz")).unwrap()))
    });
}

/// Random secrets, the workload the experiments measure.
fn bench_random_secrets(c: &mut Criterion) {
    let alphabet = Alphabet::alphanumeric();
    let sequence = enumerate(&alphabet, 2).unwrap();
    let secrets = common::generate_secrets(&alphabet, 2, 1_000);
    let searcher = BruteForce::new();

    let mut group = c.benchmark_group("random_secrets");
    group.warm_up_time(Duration::from_millis(100));

    group.bench_function("alphanumeric_2_x1000", |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for secret in &secrets {
                black_box(searcher.run(&sequence, secret).unwrap());
            }

            let elapsed = start.elapsed();
            let per_secret_ns = elapsed.as_nanos() as f64 / secrets.len() as f64;
            Duration::from_nanos((per_secret_ns * iters as f64) as u64)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_enumerate,
    bench_stream,
    bench_full_scan,
    bench_random_secrets,
);
criterion_main!(benches);
