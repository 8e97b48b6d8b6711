//! Benchmarks comparing the execution models on the same input

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parscan::{create_engine, ExecutionModel};

const INPUT_LEN: usize = 1 << 20;
const WORKERS: usize = 4;

fn bench_scan(c: &mut Criterion) {
    let input = parscan::input::generate(INPUT_LEN, Some(42));

    for model in [
        ExecutionModel::Serial,
        ExecutionModel::Shared,
        ExecutionModel::Message,
    ] {
        let engine = create_engine::<i64>(model, WORKERS).unwrap();
        c.bench_function(&format!("scan/{}", model), |bench| {
            bench.iter(|| {
                let run = engine.scan(black_box(&input)).unwrap();
                black_box(run.values)
            })
        });
    }
}

fn bench_reduce(c: &mut Criterion) {
    let input = parscan::input::generate(INPUT_LEN, Some(42));

    for model in [
        ExecutionModel::Serial,
        ExecutionModel::Shared,
        ExecutionModel::Message,
    ] {
        let engine = create_engine::<i64>(model, WORKERS).unwrap();
        c.bench_function(&format!("reduce/{}", model), |bench| {
            bench.iter(|| {
                let run = engine.reduce(black_box(&input)).unwrap();
                black_box(run.total)
            })
        });
    }
}

criterion_group!(benches, bench_scan, bench_reduce);
criterion_main!(benches);
