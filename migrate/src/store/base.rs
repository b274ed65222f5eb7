use std::collections::HashSet;
use std::future::Future;

use crate::error::{ErrorKind, MigrateResult};
use crate::migrate_error;
use crate::types::RecordIdentifier;

/// Ordered, append-only set of migrated record identifiers.
///
/// Order is the order in which records were confirmed and is kept only so the
/// persisted file reads naturally. Membership is what matters: duplicates found
/// in a loaded file are kept as-is but never cause a record to be processed again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointSet {
    ids: Vec<RecordIdentifier>,
    index: HashSet<RecordIdentifier>,
}

impl CheckpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from identifiers in persisted order, duplicates included.
    pub fn from_ids(ids: Vec<RecordIdentifier>) -> Self {
        let index = ids.iter().cloned().collect();

        Self { ids, index }
    }

    /// Returns `true` if `id` is exactly equal to a checkpointed identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Appends `id` unless it is already present.
    ///
    /// Returns `false` if the identifier was already in the set.
    pub fn insert(&mut self, id: RecordIdentifier) -> bool {
        if !self.index.insert(id.clone()) {
            return false;
        }

        self.ids.push(id);
        true
    }

    pub fn ids(&self) -> &[RecordIdentifier] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Decodes the persisted representation, a JSON array of strings.
    ///
    /// Empty or whitespace-only content is an empty set. Anything else that is not a
    /// JSON array of strings fails with [`ErrorKind::CorruptStore`].
    pub fn from_json(content: &[u8]) -> MigrateResult<CheckpointSet> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(CheckpointSet::new());
        }

        let ids: Vec<RecordIdentifier> = serde_json::from_slice(content).map_err(|err| {
            migrate_error!(
                ErrorKind::CorruptStore,
                "Checkpoint content is not a JSON array of strings",
                err
            )
        })?;

        Ok(CheckpointSet::from_ids(ids))
    }

    /// Encodes the full set as a pretty-printed JSON array.
    pub fn to_json(&self) -> MigrateResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.ids).map_err(|err| {
            migrate_error!(
                ErrorKind::SerializationError,
                "Checkpoint could not be encoded",
                err
            )
        })
    }
}

/// Durable storage for a [`CheckpointSet`].
///
/// Implementations are owned by a single run at a time; concurrent runs against
/// the same backing medium must be prevented by the caller.
pub trait CheckpointStore {
    /// Reads the persisted set.
    ///
    /// A missing or empty backing store yields an empty set, unparseable content
    /// fails with [`ErrorKind::CorruptStore`].
    fn load(&self) -> impl Future<Output = MigrateResult<CheckpointSet>> + Send;

    /// Adds `id` to `checkpoint` and persists the complete set before returning.
    ///
    /// The persisted representation is always a full, valid snapshot. A failed write
    /// is reported as [`ErrorKind::CheckpointWrite`]; `checkpoint` still contains `id`
    /// in that case, so a later successful append persists it as well.
    fn append(
        &self,
        checkpoint: &mut CheckpointSet,
        id: RecordIdentifier,
    ) -> impl Future<Output = MigrateResult<()>> + Send;
}
