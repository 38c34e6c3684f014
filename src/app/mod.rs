pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use cli::{CliApp, write_report};
pub use config::{Args, ViewSelection};
pub use error::AppError;
pub use logging::init_tracing;
