use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::MigrateResult;
use crate::store::{CheckpointSet, CheckpointStore};
use crate::types::RecordIdentifier;

#[derive(Debug, Default)]
struct Inner {
    persisted: CheckpointSet,
    writes: usize,
}

/// Checkpoint store kept in memory.
///
/// Clones share the same state, so a test can hand one clone to the runner and
/// inspect what was persisted through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `ids`.
    pub fn with_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RecordIdentifier>,
    {
        let inner = Inner {
            persisted: CheckpointSet::from_ids(ids.into_iter().map(Into::into).collect()),
            writes: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns the identifiers of the last persisted snapshot.
    pub async fn persisted_ids(&self) -> Vec<String> {
        let inner = self.inner.lock().await;

        inner
            .persisted
            .ids()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    /// Returns how many snapshots were written.
    pub async fn writes(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.writes
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    async fn load(&self) -> MigrateResult<CheckpointSet> {
        let inner = self.inner.lock().await;

        Ok(inner.persisted.clone())
    }

    async fn append(
        &self,
        checkpoint: &mut CheckpointSet,
        id: RecordIdentifier,
    ) -> MigrateResult<()> {
        checkpoint.insert(id);

        let mut inner = self.inner.lock().await;
        inner.persisted = checkpoint.clone();
        inner.writes += 1;

        Ok(())
    }
}
