use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::{info, warn};

use super::traits::DashboardSource;
use crate::domain::DashboardSnapshot;
use crate::streaming::{ErrorPolicy, IngestPipeline, PipelineConfig, PipelineError, SkipErrors};

/// In-memory holder of the published dashboard snapshot
///
/// Ingestion runs without touching the read/write lock; the write lock is
/// held only to swap in the finished snapshot. Concurrent `ingest` calls are
/// serialized so that the last one to finish is the one published.
pub struct AggregateStore<P = SkipErrors> {
    current: RwLock<Arc<DashboardSnapshot>>,
    ingest_lock: tokio::sync::Mutex<()>,
    pipeline: IngestPipeline<P>,
}

impl AggregateStore<SkipErrors> {
    /// Create a store with an empty snapshot and default configuration
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self::with_policy(config, SkipErrors)
    }
}

impl Default for AggregateStore<SkipErrors> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ErrorPolicy + 'static> AggregateStore<P> {
    pub fn with_policy(config: PipelineConfig, policy: P) -> Self {
        Self {
            current: RwLock::new(Arc::new(DashboardSnapshot::default())),
            ingest_lock: tokio::sync::Mutex::new(()),
            pipeline: IngestPipeline::new(config, policy),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    fn publish(&self, snapshot: Arc<DashboardSnapshot>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = snapshot;
    }
}

#[async_trait]
impl<P: ErrorPolicy + 'static> DashboardSource for AggregateStore<P> {
    async fn ingest(&self, path: &Path) -> Result<Arc<DashboardSnapshot>, PipelineError> {
        let _guard = self.ingest_lock.lock().await;

        match self.pipeline.run(path).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.publish(Arc::clone(&snapshot));
                info!(
                    path = %path.display(),
                    records = snapshot.metadata.record_count,
                    "Published dashboard snapshot"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ingestion failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    fn snapshot(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}
