pub mod store;
pub mod traits;

// Re-export commonly used types
pub use store::AggregateStore;
pub use traits::DashboardSource;
