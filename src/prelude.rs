//! Prelude module for convenient imports
//!
//! Import everything you need with: `use salesdash::prelude::*;`

// Domain types
pub use crate::domain::{
    Amount, CountryProductRevenue, DashboardSnapshot, DomainError, MonthlySales,
    ProductFrequency, RegionRevenue, SnapshotMetadata, SnapshotView, Transaction, View, ViewKind,
};

// Engine types
pub use crate::engine::{Aggregates, SnapshotBuilder};

// IO types
pub use crate::io::{CsvTransactionStream, IoError, write_metadata, write_view};

// Streaming types
pub use crate::streaming::{
    AbortOnError, AggregationStrategy, ErrorPolicy, IngestPipeline, PipelineConfig,
    PipelineError, SilentSkip, SkipErrors,
};

// Storage types
pub use crate::storage::{AggregateStore, DashboardSource};

// App types
pub use crate::app::{AppError, Args, CliApp, ViewSelection, init_tracing, write_report};
