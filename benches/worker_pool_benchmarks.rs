use batch_worker_pool::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

fn benchmark_worker_pool_creation(c: &mut Criterion) {
    c.bench_function("worker_pool_creation", |b| {
        b.iter(|| {
            let pool: WorkerPool<u64, ()> = WorkerPool::new(4).expect("Failed to create pool");
            black_box(pool);
        });
    });
}

fn benchmark_empty_run(c: &mut Criterion) {
    c.bench_function("empty_run_4_workers", |b| {
        b.iter(|| {
            let pool = WorkerPool::new(4).expect("Failed to create pool");
            pool.start(
                Vec::<u64>::new(),
                |_: &u64| Ok::<(), ()>(()),
                |_: Outcome<u64, ()>| Ok::<(), String>(()),
            )
            .expect("Run failed");
        });
    });
}

fn benchmark_batch_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_throughput");
    group.measurement_time(Duration::from_secs(10));

    for &items in &[100u64, 1_000] {
        group.throughput(Throughput::Elements(items));
        for &workers in &[1usize, 2, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("{}_items", items), workers),
                &workers,
                |b, &workers| {
                    b.iter(|| {
                        let pool = WorkerPool::new(workers).expect("Failed to create pool");
                        let mut total = 0u64;
                        let summary = pool
                            .start(
                                0..items,
                                |n: &u64| {
                                    // Simulate some work
                                    let mut sum = 0u64;
                                    for i in 0..1000 {
                                        sum = sum.wrapping_add(i ^ n);
                                    }
                                    black_box(sum);
                                    Ok::<(), ()>(())
                                },
                                |outcome: Outcome<u64, ()>| {
                                    total = total.wrapping_add(*outcome.payload());
                                    Ok::<(), String>(())
                                },
                            )
                            .expect("Run failed");
                        assert_eq!(summary.outcomes_handled, items);
                        black_box(total);
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_queue_pressure(c: &mut Criterion) {
    c.bench_function("queue_capacity_1_slow_handler", |b| {
        b.iter(|| {
            let config = WorkerPoolConfig::new(4).with_queue_capacity(1);
            let pool = WorkerPool::with_config(config).expect("Failed to create pool");
            pool.start(
                0..50u32,
                |_: &u32| Ok::<(), ()>(()),
                |_: Outcome<u32, ()>| {
                    std::thread::sleep(Duration::from_micros(20));
                    Ok::<(), String>(())
                },
            )
            .expect("Run failed");
        });
    });
}

criterion_group!(
    benches,
    benchmark_worker_pool_creation,
    benchmark_empty_run,
    benchmark_batch_throughput,
    benchmark_queue_pressure
);
criterion_main!(benches);
