use std::io;
use thiserror::Error;

/// IO-level errors for CSV reading and writing
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV async parsing error: {0}")]
    CsvAsync(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Missing header row")]
    MissingHeader,
}

impl IoError {
    /// Whether this error must abort the whole run
    ///
    /// Source and header failures are fatal; a structurally malformed row
    /// is not.
    pub fn is_fatal(&self) -> bool {
        match self {
            IoError::Io(_) | IoError::MissingHeader => true,
            IoError::Csv(e) => e.is_io_error(),
            IoError::CsvAsync(e) => matches!(e.kind(), csv_async::ErrorKind::Io(_)),
        }
    }
}
