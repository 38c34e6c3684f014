pub mod aggregates;
pub mod builder;

// Re-export commonly used types
pub use aggregates::{AggregateParts, Aggregates};
pub use builder::SnapshotBuilder;
