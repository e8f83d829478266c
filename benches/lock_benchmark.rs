/*!
 * Lock and Barrier Benchmarks
 *
 * Compare lock algorithms uncontended and under the counter workload, and
 * barrier algorithms under turn-taking
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lockbench::core::sync::Lock;
use lockbench::{bucket_fill, BarrierKind, CounterBenchmark, CounterMode, LockKind, RunConfig};

fn bench_uncontended_acquire(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended_acquire");

    for kind in LockKind::ALL {
        let lock = Lock::new(kind, 1).unwrap();
        let mut me = lock.participant().unwrap();

        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| {
                let guard = lock.acquire(&mut me);
                black_box(&guard);
            });
        });
    }

    group.finish();
}

fn bench_contended_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_counter");
    group.sample_size(20);

    for kind in LockKind::ALL {
        let participants = kind.max_participants().unwrap_or(4);
        let benchmark = CounterBenchmark::new(RunConfig::default().with_lock(kind).with_participants(participants))
            .iterations(10_000);

        group.bench_with_input(
            BenchmarkId::new(kind.token(), participants),
            &benchmark,
            |b, benchmark| {
                b.iter(|| black_box(benchmark.run().unwrap().value.value));
            },
        );
    }

    group.finish();
}

fn bench_barrier_turns(c: &mut Criterion) {
    let mut group = c.benchmark_group("barrier_turns");
    group.sample_size(20);

    for barrier in BarrierKind::ALL {
        let benchmark = CounterBenchmark::new(RunConfig::default().with_barrier(barrier).with_participants(4))
            .mode(CounterMode::BarrierTurns)
            .iterations(1_000);

        group.bench_with_input(BenchmarkId::from_parameter(barrier), &benchmark, |b, benchmark| {
            b.iter(|| black_box(benchmark.run().unwrap().value.value));
        });
    }

    group.finish();
}

fn bench_bucket_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_fill");
    group.sample_size(20);

    let input: Vec<i64> = (0..50_000).map(|i| (i * 7_919) % 100_003).collect();

    for kind in [LockKind::TestAndTestAndSet, LockKind::Ticket, LockKind::Mcs, LockKind::NativeMutex] {
        let config = RunConfig::default().with_lock(kind).with_participants(4);

        group.bench_with_input(BenchmarkId::from_parameter(kind), &config, |b, config| {
            b.iter(|| black_box(bucket_fill(config, &input).unwrap().value.len()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_uncontended_acquire,
    bench_contended_counter,
    bench_barrier_turns,
    bench_bucket_fill
);

criterion_main!(benches);
