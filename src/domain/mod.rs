pub mod amount;
pub mod error;
pub mod snapshot;
pub mod transaction;
pub mod views;

// Re-export commonly used types
pub use amount::Amount;
pub use error::DomainError;
pub use snapshot::{DashboardSnapshot, SnapshotMetadata, SnapshotView, View, ViewKind};
pub use transaction::Transaction;
pub use views::{CountryProductRevenue, MonthKey, MonthlySales, ProductFrequency, RegionRevenue};
