use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::engine::SnapshotBuilder;
use crate::engine::builder::{DEFAULT_TOP_PRODUCTS, DEFAULT_TOP_REGIONS};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// How workers share aggregation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationStrategy {
    /// All workers fold into one `Aggregates` behind a single mutex
    #[default]
    SharedLock,

    /// Each worker folds into its own `Aggregates`; partials are merged after the barrier
    PerWorker,
}

impl AggregationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationStrategy::SharedLock => "shared-lock",
            AggregationStrategy::PerWorker => "per-worker",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "shared-lock" | "shared" => Ok(AggregationStrategy::SharedLock),
            "per-worker" | "sharded" => Ok(AggregationStrategy::PerWorker),
            other => Err(format!(
                "unknown aggregation strategy '{other}' (expected shared-lock or per-worker)"
            )),
        }
    }
}

/// Tuning knobs for one ingestion run
///
/// # Example
/// ```rust,ignore
/// let config = PipelineConfig::default()
///     .with_workers(4)
///     .with_strategy(AggregationStrategy::PerWorker);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    workers: Option<usize>,
    queue_capacity: usize,
    progress_interval: u64,
    top_products_limit: usize,
    top_regions_limit: usize,
    strategy: AggregationStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            top_products_limit: DEFAULT_TOP_PRODUCTS,
            top_regions_limit: DEFAULT_TOP_REGIONS,
            strategy: AggregationStrategy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of aggregation workers (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Set the bounded queue capacity (at least 1)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Log progress every `interval` rows; zero disables progress lines
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_top_products_limit(mut self, limit: usize) -> Self {
        self.top_products_limit = limit;
        self
    }

    pub fn with_top_regions_limit(mut self, limit: usize) -> Self {
        self.top_regions_limit = limit;
        self
    }

    pub fn with_strategy(mut self, strategy: AggregationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Worker count, host parallelism when not configured
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    pub fn builder(&self) -> SnapshotBuilder {
        SnapshotBuilder::new()
            .with_top_products(self.top_products_limit)
            .with_top_regions(self.top_regions_limit)
    }
}
