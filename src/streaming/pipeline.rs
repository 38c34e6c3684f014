use std::path::Path;
use std::pin::pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::config::{AggregationStrategy, PipelineConfig};
use super::error::{ErrorPolicy, PipelineError, SkipErrors};
use crate::domain::{DashboardSnapshot, Transaction};
use crate::engine::Aggregates;
use crate::io::{CsvTransactionStream, IoError};

/// Receiving end of the bounded queue, shared by every worker
type Queue = Arc<tokio::sync::Mutex<mpsc::Receiver<Transaction>>>;

/// Counters reported by the reader task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub rows_read: u64,
    pub rows_skipped: u64,
}

/// One ingestion run: reader -> bounded queue -> workers -> barrier -> builder
///
/// # Example
/// ```rust,ignore
/// let pipeline = IngestPipeline::new(PipelineConfig::default(), SkipErrors);
/// let snapshot = pipeline.run("transactions.csv").await?;
/// ```
pub struct IngestPipeline<P = SkipErrors> {
    config: PipelineConfig,
    policy: Arc<P>,
}

impl<P: ErrorPolicy + 'static> IngestPipeline<P> {
    pub fn new(config: PipelineConfig, policy: P) -> Self {
        Self {
            config,
            policy: Arc::new(policy),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ingest a CSV file and build a snapshot from it
    ///
    /// Opening the file and reading its header happen before any task is
    /// spawned; failures there are returned as [`PipelineError::Io`].
    pub async fn run(&self, path: impl AsRef<Path>) -> Result<DashboardSnapshot, PipelineError> {
        let started = Instant::now();
        let path = path.as_ref();

        let stream = CsvTransactionStream::from_file(path).await?;
        info!(path = %path.display(), "Started ingestion");

        self.run_stream(stream, started).await
    }

    /// Aggregate an already-open transaction stream
    ///
    /// Row-level errors go to the error policy; fatal errors abort the run.
    pub async fn run_stream<S>(
        &self,
        stream: S,
        started: Instant,
    ) -> Result<DashboardSnapshot, PipelineError>
    where
        S: Stream<Item = Result<Transaction, IoError>> + Send + 'static,
    {
        let worker_count = self.config.workers();
        let strategy = self.config.strategy();
        let (sender, receiver) = mpsc::channel(self.config.queue_capacity());
        let queue: Queue = Arc::new(tokio::sync::Mutex::new(receiver));
        let shared = Arc::new(Mutex::new(Aggregates::new()));

        debug!(workers = worker_count, %strategy, "Spawning aggregation workers");

        let mut workers = JoinSet::new();
        for worker in 0..worker_count {
            let queue = Arc::clone(&queue);
            match strategy {
                AggregationStrategy::SharedLock => {
                    let shared = Arc::clone(&shared);
                    workers.spawn(async move {
                        let processed = drain(&queue, |tx| {
                            shared
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .apply(&tx);
                        })
                        .await;
                        debug!(worker, processed, "Worker finished");
                        None
                    });
                }
                AggregationStrategy::PerWorker => {
                    workers.spawn(async move {
                        let mut local = Aggregates::new();
                        let processed = drain(&queue, |tx| local.apply(&tx)).await;
                        debug!(worker, processed, "Worker finished");
                        Some(local)
                    });
                }
            }
        }
        // Workers own the receiver through their clones
        drop(queue);

        let reader = tokio::spawn(feed_queue(
            stream,
            sender,
            Arc::clone(&self.policy),
            self.config.progress_interval(),
        ));

        let stats = match reader.await {
            Ok(Ok(stats)) => stats,
            Ok(Err(e)) => {
                workers.abort_all();
                return Err(e);
            }
            Err(e) => {
                workers.abort_all();
                return Err(PipelineError::ReaderPanicked(e.to_string()));
            }
        };

        let mut partials = Vec::new();
        while let Some(result) = workers.join_next().await {
            match result {
                Ok(Some(partial)) => partials.push(partial),
                Ok(None) => {}
                Err(e) => {
                    workers.abort_all();
                    return Err(PipelineError::WorkerPanicked(e.to_string()));
                }
            }
        }

        let mut aggregates =
            std::mem::take(&mut *shared.lock().unwrap_or_else(PoisonError::into_inner));
        for partial in partials {
            aggregates.merge(partial);
        }

        let snapshot = self
            .config
            .builder()
            .build(aggregates, stats.rows_skipped, started);

        info!(
            rows_read = stats.rows_read,
            records = snapshot.metadata.record_count,
            rows_skipped = stats.rows_skipped,
            groups = snapshot.metadata.distinct_groups,
            duration = ?snapshot.metadata.processing_duration,
            "Ingestion complete"
        );

        Ok(snapshot)
    }
}

/// Pull records until the queue is closed and empty
async fn drain<F>(queue: &Queue, mut fold: F) -> u64
where
    F: FnMut(Transaction),
{
    let mut processed = 0;
    loop {
        let next = queue.lock().await.recv().await;
        match next {
            Some(tx) => {
                fold(tx);
                processed += 1;
            }
            None => return processed,
        }
    }
}

/// Reader task: stream rows into the bounded queue
///
/// Returns when the stream ends; dropping `sender` closes the queue.
async fn feed_queue<S, P>(
    stream: S,
    sender: mpsc::Sender<Transaction>,
    policy: Arc<P>,
    progress_interval: u64,
) -> Result<ReadStats, PipelineError>
where
    S: Stream<Item = Result<Transaction, IoError>> + Send,
    P: ErrorPolicy,
{
    let mut stream = pin!(stream);
    let mut stats = ReadStats::default();

    while let Some(item) = stream.next().await {
        stats.rows_read += 1;
        let row = stats.rows_read;

        match item {
            Ok(tx) => {
                if sender.send(tx).await.is_err() {
                    // Every worker is gone; the join loop reports why
                    break;
                }
            }
            Err(e) if e.is_fatal() => return Err(PipelineError::Io(e)),
            Err(e) => {
                stats.rows_skipped += 1;
                if !policy.handle_row_error(row, &e) {
                    return Err(PipelineError::Aborted { row, source: e });
                }
            }
        }

        if progress_interval > 0 && row % progress_interval == 0 {
            info!(rows_read = row, rows_skipped = stats.rows_skipped, "Ingestion progress");
        }
    }

    info!(
        rows_read = stats.rows_read,
        rows_skipped = stats.rows_skipped,
        "Finished reading"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, ViewKind};
    use crate::streaming::error::{AbortOnError, SilentSkip};
    use futures::stream;

    fn tx(
        row: u64,
        country: &str,
        product: &str,
        total: i64,
        quantity: i64,
        stock: i64,
    ) -> Transaction {
        Transaction {
            row,
            country: country.to_string(),
            product_name: product.to_string(),
            region: format!("{country}-region"),
            total_price: Amount::from_raw(total * 10_000),
            quantity,
            stock_quantity: stock,
            ..Default::default()
        }
    }

    fn malformed_row() -> IoError {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"\xff\xfe\n"[..]);
        let err = reader
            .records()
            .find_map(Result::err)
            .expect("invalid UTF-8 row should fail");
        IoError::from(err)
    }

    fn sample(rows: u64) -> Vec<Result<Transaction, IoError>> {
        (1..=rows)
            .map(|row| {
                let country = ["USA", "UK", "FR"][(row % 3) as usize];
                let product = ["Laptop", "Phone", "Mouse", "Cable"][(row % 4) as usize];
                let total = (row % 17) as i64 + 1;
                Ok(tx(row, country, product, total, (row % 5) as i64, (row % 7) as i64))
            })
            .collect()
    }

    fn pipeline(strategy: AggregationStrategy, workers: usize) -> IngestPipeline<SilentSkip> {
        let config = PipelineConfig::new()
            .with_workers(workers)
            .with_queue_capacity(8)
            .with_strategy(strategy);
        IngestPipeline::new(config, SilentSkip)
    }

    #[tokio::test]
    async fn aggregates_scenario() {
        let rows = vec![
            Ok(tx(1, "USA", "Laptop", 1000, 2, 0)),
            Ok(tx(2, "USA", "Laptop", 500, 1, 0)),
            Ok(tx(3, "UK", "Phone", 800, 1, 0)),
        ];

        let snapshot = pipeline(AggregationStrategy::SharedLock, 4)
            .run_stream(stream::iter(rows), Instant::now())
            .await
            .unwrap();

        assert_eq!(snapshot.country_revenues.len(), 2);
        let usa = &snapshot.country_revenues[0];
        assert_eq!(usa.country, "USA");
        assert_eq!(usa.total_revenue, Amount::from_raw(15_000_000));
        assert_eq!(usa.transaction_count, 2);
        let uk = &snapshot.country_revenues[1];
        assert_eq!(uk.total_revenue, Amount::from_raw(8_000_000));
        assert_eq!(uk.transaction_count, 1);
        assert_eq!(snapshot.metadata.record_count, 3);
    }

    #[tokio::test]
    async fn stock_is_latest_non_zero_reading() {
        for strategy in [AggregationStrategy::SharedLock, AggregationStrategy::PerWorker] {
            let rows = vec![
                Ok(tx(1, "USA", "Laptop", 10, 1, 100)),
                Ok(tx(2, "USA", "Laptop", 10, 1, 0)),
                Ok(tx(3, "USA", "Laptop", 10, 1, 150)),
            ];
            let snapshot = pipeline(strategy, 3)
                .run_stream(stream::iter(rows), Instant::now())
                .await
                .unwrap();
            assert_eq!(snapshot.top_products[0].current_stock, 150);
        }
    }

    #[tokio::test]
    async fn strategies_produce_identical_views() {
        let shared = pipeline(AggregationStrategy::SharedLock, 4)
            .run_stream(stream::iter(sample(5_000)), Instant::now())
            .await
            .unwrap();
        let per_worker = pipeline(AggregationStrategy::PerWorker, 4)
            .run_stream(stream::iter(sample(5_000)), Instant::now())
            .await
            .unwrap();

        assert!(shared.same_views(&per_worker));
        assert_eq!(shared.metadata.record_count, 5_000);
        assert_eq!(per_worker.metadata.record_count, 5_000);
    }

    #[tokio::test]
    async fn transaction_counts_sum_to_valid_rows() {
        let mut rows = sample(1_000);
        rows.insert(10, Err(malformed_row()));
        rows.insert(500, Err(malformed_row()));

        let snapshot = pipeline(AggregationStrategy::SharedLock, 3)
            .run_stream(stream::iter(rows), Instant::now())
            .await
            .unwrap();

        let counted: u64 = snapshot
            .country_revenues
            .iter()
            .map(|c| c.transaction_count)
            .sum();
        assert_eq!(counted, 1_000);
        assert_eq!(snapshot.metadata.record_count, 1_000);
        assert_eq!(snapshot.metadata.rows_skipped, 2);
    }

    #[tokio::test]
    async fn abort_policy_stops_at_malformed_row() {
        let rows = vec![
            Ok(tx(1, "USA", "Laptop", 10, 1, 0)),
            Err(malformed_row()),
            Ok(tx(3, "USA", "Laptop", 10, 1, 0)),
        ];
        let pipeline = IngestPipeline::new(PipelineConfig::new().with_workers(2), AbortOnError);

        let result = pipeline.run_stream(stream::iter(rows), Instant::now()).await;

        match result {
            Err(PipelineError::Aborted { row, .. }) => assert_eq!(row, 2),
            other => panic!("Expected abort at row 2, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fatal_error_aborts_even_when_skipping() {
        let rows = vec![
            Ok(tx(1, "USA", "Laptop", 10, 1, 0)),
            Err(IoError::from(std::io::Error::other("disk gone"))),
        ];

        let result = pipeline(AggregationStrategy::PerWorker, 2)
            .run_stream(stream::iter(rows), Instant::now())
            .await;

        assert!(matches!(result, Err(PipelineError::Io(IoError::Io(_)))));
    }

    #[tokio::test]
    async fn empty_stream_builds_empty_snapshot() {
        let snapshot = pipeline(AggregationStrategy::SharedLock, 2)
            .run_stream(stream::iter(Vec::new()), Instant::now())
            .await
            .unwrap();

        for kind in ViewKind::ALL {
            assert!(snapshot.view(kind).is_empty());
        }
        assert_eq!(snapshot.metadata.record_count, 0);
        assert!(snapshot.metadata.last_updated.is_some());
    }

    #[tokio::test]
    async fn missing_file_fails_before_spawning() {
        let pipeline = IngestPipeline::new(PipelineConfig::default(), SkipErrors);

        let result = pipeline.run("/definitely/not/here.csv").await;

        assert!(matches!(result, Err(PipelineError::Io(IoError::Io(_)))));
    }
}
