//! Benchmarks for the task scheduler core.
//!
//! Benchmarks cover:
//! - Queue operations (enqueue/dequeue, duplicate-combining scan)
//! - Latch countdown
//! - End-to-end pool submit and drain

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use taskpool::core::{ConcurrentQueue, Latch, ThreadPool};

// ============================================================================
// Queue Benchmarks
// ============================================================================

fn bench_queue_enqueue_dequeue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_enqueue_dequeue");

    for size in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let queue = ConcurrentQueue::new();
                for i in 0..size {
                    queue.enqueue(i);
                }
                while let Some(item) = queue.try_dequeue() {
                    black_box(item);
                }
            });
        });
    }
    group.finish();
}

fn bench_queue_duplicate_combining(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_duplicate_combining");

    // Duplicate-heavy input exercises the linear scan and combine path.
    for size in [100u64, 1_000, 5_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let queue = ConcurrentQueue::new();
                let mut combined = 0u64;
                for i in 0..size {
                    queue.enqueue_if_absent(i % 50, |_, _| combined += 1);
                }
                black_box((queue.len(), combined));
            });
        });
    }
    group.finish();
}

// ============================================================================
// Latch Benchmarks
// ============================================================================

fn bench_latch_count_down(c: &mut Criterion) {
    let mut group = c.benchmark_group("latch_count_down");

    for count in [100isize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let latch = Latch::new(count);
                for _ in 0..count {
                    latch.count_down(1);
                }
                black_box(latch.is_ready());
            });
        });
    }
    group.finish();
}

// ============================================================================
// End-to-End Pool Benchmarks
// ============================================================================

fn bench_pool_submit_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_submit_drain");
    const TASKS: u64 = 256;

    for workers in [1usize, 2, 4] {
        group.throughput(Throughput::Elements(TASKS));
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    let pool = ThreadPool::new("bench", workers);
                    let done = Arc::new(AtomicU64::new(0));
                    for _ in 0..TASKS {
                        let done = Arc::clone(&done);
                        pool.submit(move || {
                            done.fetch_add(1, Ordering::Relaxed);
                        })
                        .unwrap();
                    }
                    pool.wait_idle();
                    black_box(done.load(Ordering::Relaxed));
                });
            },
        );
    }
    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(
    queue_benches,
    bench_queue_enqueue_dequeue,
    bench_queue_duplicate_combining
);

criterion_group!(latch_benches, bench_latch_count_down);

criterion_group!(pool_benches, bench_pool_submit_drain);

criterion_main!(queue_benches, latch_benches, pool_benches);
