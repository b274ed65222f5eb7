use std::collections::HashSet;
use std::sync::Arc;

use crate::bail;
use crate::error::{ErrorKind, MigrateResult};
use crate::store::{CheckpointSet, CheckpointStore};
use crate::types::RecordIdentifier;

/// Checkpoint store wrapper whose append fails for selected identifiers.
///
/// A failing append still adds the id to the in-memory set, like a real store whose
/// flush failed.
#[derive(Debug, Clone)]
pub struct FaultInjectingCheckpointStore<S> {
    inner: S,
    fail_append_for: Arc<HashSet<String>>,
}

impl<S> FaultInjectingCheckpointStore<S> {
    pub fn wrap<'a>(inner: S, fail_append_for: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            inner,
            fail_append_for: Arc::new(fail_append_for.into_iter().map(str::to_string).collect()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> CheckpointStore for FaultInjectingCheckpointStore<S>
where
    S: CheckpointStore + Sync,
{
    async fn load(&self) -> MigrateResult<CheckpointSet> {
        self.inner.load().await
    }

    async fn append(
        &self,
        checkpoint: &mut CheckpointSet,
        id: RecordIdentifier,
    ) -> MigrateResult<()> {
        if self.fail_append_for.contains(id.as_str()) {
            checkpoint.insert(id.clone());
            bail!(ErrorKind::CheckpointWrite, "Injected checkpoint failure", id);
        }

        self.inner.append(checkpoint, id).await
    }
}
