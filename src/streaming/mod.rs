pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use config::{AggregationStrategy, PipelineConfig};
pub use error::{AbortOnError, ErrorPolicy, PipelineError, SilentSkip, SkipErrors};
pub use pipeline::{IngestPipeline, ReadStats};
