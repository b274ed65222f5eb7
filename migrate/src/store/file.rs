use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, MigrateResult};
use crate::migrate_error;
use crate::store::{CheckpointSet, CheckpointStore};
use crate::types::RecordIdentifier;

/// Checkpoint stored as a JSON array of strings in a single file.
///
/// Every append rewrites the whole file: the snapshot goes to a temporary file in
/// the same directory, is synced, and is then renamed over the target. A crash at
/// any point leaves either the previous or the new snapshot, never a partial one.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and an empty store if the file does not exist yet.
    ///
    /// Returns `true` if a new store was created.
    pub async fn create_if_missing(&self) -> MigrateResult<bool> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let empty = CheckpointSet::new().to_json()?;
        atomic_write_file(&self.path, &empty).await?;

        info!(path = %self.path.display(), "created empty checkpoint store");

        Ok(true)
    }
}

impl CheckpointStore for FileCheckpointStore {
    async fn load(&self) -> MigrateResult<CheckpointSet> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    path = %self.path.display(),
                    "checkpoint store does not exist, starting empty"
                );
                return Ok(CheckpointSet::new());
            }
            Err(err) => return Err(err.into()),
        };

        let checkpoint = CheckpointSet::from_json(&content)?;
        info!(
            path = %self.path.display(),
            migrated = checkpoint.len(),
            "loaded checkpoint store"
        );

        Ok(checkpoint)
    }

    async fn append(
        &self,
        checkpoint: &mut CheckpointSet,
        id: RecordIdentifier,
    ) -> MigrateResult<()> {
        debug!(record_id = %id, "appending to checkpoint store");
        checkpoint.insert(id);

        let content = checkpoint.to_json()?;
        atomic_write_file(&self.path, &content)
            .await
            .map_err(|err| {
                migrate_error!(
                    ErrorKind::CheckpointWrite,
                    "Failed to persist checkpoint",
                    format!("{}: {err}", self.path.display())
                )
            })
    }
}

/// Writes `data` to a uniquely named temporary file next to `path`, syncs it and
/// renames it over `path`.
async fn atomic_write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("checkpoint"),
        uuid::Uuid::new_v4()
    );
    let temp_path = path.with_file_name(temp_name);

    if let Err(err) = write_and_rename(&temp_path, path, data).await {
        if let Err(remove_err) = tokio::fs::remove_file(&temp_path).await
            && remove_err.kind() != io::ErrorKind::NotFound
        {
            warn!(
                path = %temp_path.display(),
                error = %remove_err,
                "failed to remove temporary checkpoint file"
            );
        }

        return Err(err);
    }

    // The rename is only durable once the directory entry itself is synced.
    #[cfg(unix)]
    {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if let Ok(dir) = tokio::fs::File::open(parent).await {
            let _ = dir.sync_all().await;
        }
    }

    Ok(())
}

async fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(temp_path, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("progress.json"));

        let checkpoint = store.load().await.unwrap();

        assert!(checkpoint.is_empty());
    }

    #[tokio::test]
    async fn empty_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "").unwrap();

        let checkpoint = FileCheckpointStore::new(&path).load().await.unwrap();

        assert!(checkpoint.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "\"not json").unwrap();

        let err = FileCheckpointStore::new(&path).load().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CorruptStore);
    }

    #[tokio::test]
    async fn append_rewrites_full_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "[\"A\"]").unwrap();
        let store = FileCheckpointStore::new(&path);

        let mut checkpoint = store.load().await.unwrap();
        store.append(&mut checkpoint, "B".into()).await.unwrap();
        store.append(&mut checkpoint, "C".into()).await.unwrap();

        let on_disk: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec!["A", "B", "C"]);
        assert!(temp_files(dir.path()).is_empty());

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, checkpoint);
    }

    #[tokio::test]
    async fn every_append_leaves_a_complete_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let store = FileCheckpointStore::new(&path);
        let ids = ["A", "B", "C", "D"];

        let mut checkpoint = store.load().await.unwrap();
        for (index, id) in ids.iter().enumerate() {
            store.append(&mut checkpoint, (*id).into()).await.unwrap();

            let on_disk: Vec<String> =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(on_disk, ids[..=index].to_vec());
            assert!(temp_files(dir.path()).is_empty());
        }
    }

    #[tokio::test]
    async fn write_failure_is_a_checkpoint_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("missing-dir").join("progress.json"));
        let mut checkpoint = CheckpointSet::new();

        let err = store.append(&mut checkpoint, "A".into()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CheckpointWrite);
        assert!(checkpoint.contains("A"));
    }

    #[tokio::test]
    async fn failed_rename_keeps_previous_snapshot_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail after the
        // temporary file was fully written.
        let path = dir.path().join("progress.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();
        let store = FileCheckpointStore::new(&path);
        let mut checkpoint = CheckpointSet::new();

        let err = store.append(&mut checkpoint, "A".into()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CheckpointWrite);
        assert!(temp_files(dir.path()).is_empty());
        assert!(path.join("keep").exists());
    }

    #[tokio::test]
    async fn create_if_missing_creates_empty_store_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts").join("progress.json");
        let store = FileCheckpointStore::new(&path);

        assert!(store.create_if_missing().await.unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        let mut checkpoint = store.load().await.unwrap();
        store.append(&mut checkpoint, "A".into()).await.unwrap();

        assert!(!store.create_if_missing().await.unwrap());
        assert!(store.load().await.unwrap().contains("A"));
    }
}
