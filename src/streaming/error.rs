use thiserror::Error;
use tracing::warn;

use crate::io::IoError;

/// Errors that end an ingestion run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Ingestion failed: {0}")]
    Io(#[from] IoError),

    #[error("Aborted at row {row}: {source}")]
    Aborted {
        row: u64,
        #[source]
        source: IoError,
    },

    #[error("Reader task panicked: {0}")]
    ReaderPanicked(String),

    #[error("Worker task panicked: {0}")]
    WorkerPanicked(String),
}

/// Policy for handling row-level errors during ingestion
///
/// Fatal errors (see [`IoError::is_fatal`]) never reach the policy.
pub trait ErrorPolicy: Send + Sync {
    /// Handle a malformed row
    /// Return true to skip it and continue, false to abort the run
    fn handle_row_error(&self, row: u64, error: &IoError) -> bool;
}

/// Skip malformed rows and log a warning for each
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_row_error(&self, row: u64, error: &IoError) -> bool {
        warn!(row, %error, "Skipping malformed row");
        true
    }
}

/// Abort on first malformed row
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_row_error(&self, row: u64, error: &IoError) -> bool {
        warn!(row, %error, "Aborting on malformed row");
        false
    }
}

/// Silent error policy - skip errors without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_row_error(&self, _row: u64, _error: &IoError) -> bool {
        true
    }
}
