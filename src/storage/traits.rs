use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DashboardSnapshot, SnapshotView, ViewKind};
use crate::streaming::PipelineError;

/// The two contracts outer layers (HTTP handlers, CLI) consume
///
/// Writers go through `ingest`; readers only ever see a fully built
/// snapshot and never wait on an ingestion in progress.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Run a full ingestion of `path` and publish the result
    ///
    /// On error the previously published snapshot stays in place.
    async fn ingest(&self, path: &Path) -> Result<Arc<DashboardSnapshot>, PipelineError>;

    /// The currently published snapshot
    fn snapshot(&self) -> Arc<DashboardSnapshot>;

    /// One named view of the current snapshot
    fn view(&self, kind: ViewKind) -> SnapshotView {
        SnapshotView::new(self.snapshot(), kind)
    }
}
