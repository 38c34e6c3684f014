pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod parse;

// Re-export commonly used types
pub use csv_reader::CsvTransactionStream;
pub use csv_writer::{CsvRow, write_metadata, write_view};
pub use error::IoError;
pub use parse::{Column, ColumnMap, parse_record};
