//! # Repository Benchmarks
//!
//! Measures operator application, measurement and the JSON save/load round trip.
//! Apply is O(n²) in the state dimension; save/load is O(S × n).
//!
//! Run: `cargo bench --bench repository_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use qstate::{catalog, Operator, QuantumState, StateRepository};

/// Uniform superposition of dimension n
fn uniform(n: usize) -> Vec<Complex64> {
    let a = 1.0 / (n as f64).sqrt();
    vec![Complex64::new(a, 0.0); n]
}

/// Cyclic shift matrix (permutation, unitary)
fn shift(n: usize) -> Operator {
    let matrix = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| Complex64::new(if (i + 1) % n == j { 1.0 } else { 0.0 }, 0.0))
                .collect()
        })
        .collect();
    Operator::new("shift", matrix).unwrap()
}

/// Benchmark Operator::apply by dimension
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("operator_apply");

    let h = catalog::builtin("H").unwrap();
    let zero = QuantumState::basis_state("q0", 2, 0).unwrap();
    group.bench_function("hadamard_2", |b| {
        b.iter(|| black_box(h.apply(black_box(&zero)).unwrap()))
    });

    for size in [4usize, 16, 64] {
        let op = shift(size);
        let state = QuantumState::new("u", uniform(size), "computational").unwrap();
        group.bench_with_input(BenchmarkId::new("shift", size), &state, |b, s| {
            b.iter(|| black_box(op.apply(s).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark measurement
fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_measure");

    for size in [2usize, 64, 1024] {
        let state = QuantumState::new("u", uniform(size), "computational").unwrap();
        group.bench_with_input(BenchmarkId::new("measure", size), &state, |b, s| {
            b.iter(|| black_box(s.measure().total()))
        });
    }

    group.finish();
}

/// Benchmark repository apply with colliding names
fn bench_repository_apply(c: &mut Criterion) {
    let x = catalog::builtin("X").unwrap();

    c.bench_function("repository_apply_collisions_100", |b| {
        b.iter(|| {
            let mut repo = StateRepository::new();
            repo.add("q0", uniform(2), None).unwrap();
            for _ in 0..100 {
                repo.apply("q0", &x, None).unwrap();
            }
            black_box(repo.len())
        })
    });
}

/// Benchmark save + load
fn bench_persistence(c: &mut Criterion) {
    let dir = std::env::temp_dir().join("qstate-bench");
    let path = dir.join("states.json");

    let mut repo = StateRepository::new();
    for i in 0..256 {
        repo.add(&format!("q{i}"), uniform(8), None).unwrap();
    }

    c.bench_function("save_load_256x8", |b| {
        b.iter(|| {
            repo.save(&path).unwrap();
            let mut fresh = StateRepository::new();
            black_box(fresh.load(&path).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_apply,
    bench_measure,
    bench_repository_apply,
    bench_persistence,
);

criterion_main!(benches);
