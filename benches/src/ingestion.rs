mod common;

use std::hint::black_box;
use std::time::Instant;

use common::{generate_sales_csv, generate_sales_file};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::io::Cursor;
use salesdash::prelude::*;
use tokio::runtime::Runtime;

/// Benchmark the in-memory pipeline across dataset sizes
fn bench_pipeline_dataset_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_sizes");
    let runtime = Runtime::new().unwrap();

    for (size_name, num_rows, num_products) in [
        ("small_1k", 1_000, 50),
        ("medium_10k", 10_000, 500),
        ("large_100k", 100_000, 2_000),
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(size_name),
            &(num_rows, num_products),
            |b, &(num_rows, num_products)| {
                b.to_async(&runtime).iter_batched(
                    || generate_sales_csv(num_rows, num_products, 60, 10).into_bytes(),
                    |csv_data| async move {
                        let pipeline = IngestPipeline::new(PipelineConfig::default(), SilentSkip);
                        let stream = CsvTransactionStream::new(Cursor::new(csv_data))
                            .await
                            .unwrap();
                        black_box(pipeline.run_stream(stream, Instant::now()).await.unwrap());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

/// Compare aggregation strategies and worker counts on the same data
fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation_strategies");
    let runtime = Runtime::new().unwrap();
    let csv_data = generate_sales_csv(50_000, 1_000, 60, 10).into_bytes();

    for strategy in [AggregationStrategy::SharedLock, AggregationStrategy::PerWorker] {
        for workers in [1, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), workers),
                &workers,
                |b, &workers| {
                    b.to_async(&runtime).iter_batched(
                        || csv_data.clone(),
                        |csv_data| async move {
                            let config = PipelineConfig::new()
                                .with_workers(workers)
                                .with_strategy(strategy);
                            let pipeline = IngestPipeline::new(config, SilentSkip);
                            let stream = CsvTransactionStream::new(Cursor::new(csv_data))
                                .await
                                .unwrap();
                            black_box(pipeline.run_stream(stream, Instant::now()).await.unwrap());
                        },
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }

    group.finish();
}

/// End-to-end: file on disk through the store
fn bench_store_ingest(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    generate_sales_file(&path, 100_000, 2_000, 60, 10).unwrap();
    let store = AggregateStore::with_config(PipelineConfig::default().with_progress_interval(0));

    c.bench_function("store_ingest_100k", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(store.ingest(&path).await.unwrap()) });
    });
}

criterion_group!(
    benches,
    bench_pipeline_dataset_sizes,
    bench_strategies,
    bench_store_ingest
);
criterion_main!(benches);
