//! Criterion benchmarks for factory_diagnostics

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use factory_diagnostics::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn bench_logger(max_retained: usize, max_persisted: usize) -> Logger {
    Logger::builder()
        .threshold(LogLevel::Info)
        .max_retained(max_retained)
        .max_persisted(max_persisted)
        .console_enabled(false)
        .durable_slot(MemorySlot::new("bench-logs"))
        .build()
}

fn filled_logger(count: usize) -> Logger {
    let logger = bench_logger(count, 0);
    for i in 0..count {
        let level = LogLevel::ALL[i % LogLevel::ALL.len()];
        logger.emit(level, format!("Component-{}", i % 8), format!("message {}", i), None, None);
    }
    logger
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = bench_logger(1000, 0);

    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            logger.debug(black_box("Sensor"), black_box("Filtered message"));
        });
    });

    group.bench_function("below_threshold_macro", |b| {
        b.iter(|| {
            factory_diagnostics::debug!(logger, "Sensor", "reading {}", black_box(42));
        });
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| {
            logger.info(black_box("Sensor"), black_box("Accepted message"));
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let memory_only = bench_logger(1000, 0);
    group.bench_function("ring_only", |b| {
        b.iter(|| {
            memory_only.warn(black_box("Reactor"), black_box("Temperature high"));
        });
    });

    let persisted = bench_logger(1000, 100);
    group.bench_function("persist_100", |b| {
        b.iter(|| {
            persisted.warn(black_box("Reactor"), black_box("Temperature high"));
        });
    });

    let background = Logger::builder()
        .console_enabled(false)
        .durable_slot(BackgroundSlot::new(MemorySlot::new("bench-logs")))
        .build();
    group.bench_function("persist_100_background", |b| {
        b.iter(|| {
            background.warn(black_box("Reactor"), black_box("Temperature high"));
        });
    });

    let overlay = bench_logger(1000, 0);
    overlay.enable_overlay();
    group.bench_function("with_overlay", |b| {
        b.iter(|| {
            overlay.warn(black_box("Reactor"), black_box("Temperature high"));
        });
    });

    group.bench_function("with_data", |b| {
        b.iter(|| {
            memory_only.warn_with(
                black_box("Reactor"),
                black_box("Temperature high"),
                json!({"reactor": 3, "celsius": 412}),
            );
        });
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(400));

    group.bench_function("multi_thread_4", |b| {
        let logger = Arc::new(bench_logger(1000, 100));
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            logger.info(format!("Worker-{}", t), format!("message {}", i));
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Query and Export Benchmarks
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let logger = filled_logger(1000);
    let cutoff = logger.get_logs(None)[900].timestamp;

    group.bench_function("get_logs_all", |b| {
        b.iter(|| black_box(logger.get_logs(None)));
    });

    group.bench_function("get_logs_min_level", |b| {
        let filter = LogFilter::new().min_level(LogLevel::Error);
        b.iter(|| black_box(logger.get_logs(Some(&filter))));
    });

    group.bench_function("get_logs_since", |b| {
        let filter = LogFilter::new().since(cutoff);
        b.iter(|| black_box(logger.get_logs(Some(&filter))));
    });

    group.bench_function("get_stats", |b| {
        b.iter(|| black_box(logger.get_stats()));
    });

    group.bench_function("export_1000", |b| {
        b.iter(|| black_box(logger.export_logs()));
    });

    group.finish();
}

fn bench_hydration(c: &mut Criterion) {
    let mut group = c.benchmark_group("hydration");
    group.throughput(Throughput::Elements(1000));

    let exported = filled_logger(1000).export_logs().unwrap_or_default();

    group.bench_function("load_1000", |b| {
        b.iter_batched(
            || MemorySlot::with_contents("bench-logs", exported.clone()),
            |slot| {
                let logger = Logger::builder()
                    .console_enabled(false)
                    .persistence_enabled(false)
                    .durable_slot(slot)
                    .build();
                black_box(logger.get_stats())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_level_filtering,
    bench_dispatch,
    bench_concurrent_logging,
    bench_queries,
    bench_hydration,
);
criterion_main!(benches);
