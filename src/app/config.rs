use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use super::error::AppError;
use crate::domain::{DomainError, ViewKind};
use crate::streaming::PipelineConfig;
use crate::streaming::config::{AggregationStrategy, DEFAULT_QUEUE_CAPACITY};

/// Which view(s) to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSelection {
    All,
    One(ViewKind),
}

impl ViewSelection {
    pub fn kinds(&self) -> Vec<ViewKind> {
        match self {
            ViewSelection::All => ViewKind::ALL.to_vec(),
            ViewSelection::One(kind) => vec![*kind],
        }
    }
}

impl fmt::Display for ViewSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSelection::All => f.write_str("all"),
            ViewSelection::One(kind) => f.write_str(kind.as_str()),
        }
    }
}

impl FromStr for ViewSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ViewSelection::All);
        }
        s.parse().map(ViewSelection::One)
    }
}

/// Command-line and environment configuration
///
/// A `.env` file in the working directory is loaded before parsing, so every
/// `env` key below can also live there.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "salesdash",
    version,
    about = "Ingest a sales transaction CSV and print the dashboard views"
)]
pub struct Args {
    /// CSV file of sales transactions
    #[arg(env = "DATA_FILE_PATH")]
    pub data_file: PathBuf,

    /// View to print: all, revenue-by-country, top-products, sales-by-month or top-regions
    #[arg(long, default_value_t = ViewSelection::All)]
    pub view: ViewSelection,

    /// Aggregation workers (defaults to host parallelism)
    #[arg(long, env = "SALESDASH_WORKERS")]
    pub workers: Option<usize>,

    /// Capacity of the queue between reader and workers
    #[arg(long, env = "SALESDASH_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// How workers share aggregation state: shared-lock or per-worker
    #[arg(long, env = "SALESDASH_STRATEGY", default_value_t = AggregationStrategy::SharedLock)]
    pub strategy: AggregationStrategy,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SALESDASH_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Reject values clap accepts but the pipeline cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if self.workers == Some(0) {
            return Err(AppError::InvalidArguments(
                "--workers must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(AppError::InvalidArguments(
                "--queue-capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let config = PipelineConfig::new()
            .with_queue_capacity(self.queue_capacity)
            .with_strategy(self.strategy);
        match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }
}
