use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use shortid::{Broker, Scope, codec};
use std::{sync::Arc, time::Instant};
use tokio::runtime::Builder;

// Number of IDs taken per benchmark iteration.
const TOTAL_IDS: usize = 4096;

/// Benchmarks single-caller `next()` for a range of buffer capacities.
fn bench_next(c: &mut Criterion) {
    let rt = Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .unwrap();

    for capacity in [1, 16, 100, 1024] {
        let mut group = c.benchmark_group(format!("next/capacity-{capacity}"));
        group.throughput(Throughput::Elements(TOTAL_IDS as u64));

        let broker = rt.block_on(async {
            Broker::builder()
                .capacity(capacity)
                .scope(Arc::new(Scope::new()))
                .build()
                .unwrap()
        });

        group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
            b.to_async(&rt).iter_custom(|iters| {
                let broker = broker.clone();
                async move {
                    let start = Instant::now();
                    for _ in 0..iters {
                        for _ in 0..TOTAL_IDS {
                            black_box(broker.next().await);
                        }
                    }
                    start.elapsed()
                }
            });
        });

        group.finish();
    }
}

/// Benchmarks several callers draining one broker concurrently.
fn bench_many_concurrent(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();
    let callers = 8;

    let mut group = c.benchmark_group("many/concurrent");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let broker = rt.block_on(async {
        Broker::builder()
            .capacity(1024)
            .scope(Arc::new(Scope::new()))
            .build()
            .unwrap()
    });

    group.bench_function(format!("callers/{callers}/elems/{TOTAL_IDS}"), |b| {
        b.to_async(&rt).iter_custom(|iters| {
            let broker = broker.clone();
            async move {
                let start = Instant::now();
                for _ in 0..iters {
                    let tasks: Vec<_> = (0..callers)
                        .map(|_| {
                            let broker = broker.clone();
                            tokio::spawn(async move { broker.many(TOTAL_IDS / callers).await })
                        })
                        .collect();
                    for task in tasks {
                        black_box(task.await.unwrap());
                    }
                }
                start.elapsed()
            }
        });
    });

    group.finish();
}

/// Benchmarks the encoder on numerals of realistic and oversized widths.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for numeral in [
        "4701760790000",
        "4719203794301760790000",
        "123456789123456789012345678901701760790000",
    ] {
        group.bench_function(format!("digits/{}", numeral.len()), |b| {
            b.iter(|| black_box(codec::encode_decimal(black_box(numeral)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_next, bench_many_concurrent, bench_encode);
criterion_main!(benches);
