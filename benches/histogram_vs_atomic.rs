use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use misure::scales::RoughLogarithmic;
use misure::Histogram;

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: usize = 1_000_000;

fn bench_histogram_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram_record");

    group.bench_function(
        BenchmarkId::new(
            "Histogram<RoughLogarithmic>",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let scale = RoughLogarithmic::new(2.0, 0.0, 1_048_576.0, 20).unwrap();
                let histogram = Arc::new(Histogram::new("latency_us", "", scale));
                let mut handles = vec![];

                for t in 0..NUM_THREADS {
                    let histogram_clone = Arc::clone(&histogram);
                    let handle = thread::spawn(move || {
                        for i in 0..ITERATIONS_PER_THREAD {
                            histogram_clone.record(((i * 31 + t) % 1_000_000) as f64);
                        }
                    });
                    handles.push(handle);
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(histogram.count())
            })
        },
    );

    group.bench_function(
        BenchmarkId::new(
            "AtomicU64 (single)",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let counter = Arc::new(AtomicU64::new(0));
                let mut handles = vec![];

                for _ in 0..NUM_THREADS {
                    let counter_clone = Arc::clone(&counter);
                    let handle = thread::spawn(move || {
                        for _ in 0..ITERATIONS_PER_THREAD {
                            counter_clone.fetch_add(1, Ordering::Relaxed);
                        }
                    });
                    handles.push(handle);
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(counter.load(Ordering::Relaxed))
            })
        },
    );

    group.finish();
}

criterion_group!(benches, bench_histogram_record);
criterion_main!(benches);
