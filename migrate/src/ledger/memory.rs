use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, MigrateResult};
use crate::ledger::LedgerClient;
use crate::types::{Confirmation, RecordIdentifier, RecordKind, RemoteRecord, UpdateRequest};

#[derive(Debug)]
struct Inner {
    records: Vec<RemoteRecord>,
    applied_updates: Vec<UpdateRequest>,
}

/// In-process ledger holding records in memory.
///
/// Every applied update is kept, in order, so tests can assert exactly which
/// mutations reached the ledger.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<RemoteRecord>) -> Self {
        let inner = Inner {
            records,
            applied_updates: Vec::new(),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns the updates applied so far, oldest first.
    pub async fn applied_updates(&self) -> Vec<UpdateRequest> {
        let inner = self.inner.lock().await;
        inner.applied_updates.clone()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerClient for MemoryLedger {
    async fn list_records(&self, kind: RecordKind) -> MigrateResult<Vec<RemoteRecord>> {
        let inner = self.inner.lock().await;

        Ok(inner
            .records
            .iter()
            .filter(|record| record.kind == kind)
            .cloned()
            .collect())
    }

    async fn fetch_record(&self, id: &RecordIdentifier) -> MigrateResult<Option<RemoteRecord>> {
        let inner = self.inner.lock().await;

        Ok(inner.records.iter().find(|record| &record.id == id).cloned())
    }

    async fn apply_update(&self, request: &UpdateRequest) -> MigrateResult<Confirmation> {
        let mut inner = self.inner.lock().await;

        if !inner.records.iter().any(|record| record.id == request.record) {
            bail!(
                ErrorKind::LedgerRejected,
                "Record does not exist on the ledger",
                request.record
            );
        }

        inner.applied_updates.push(request.clone());
        let signature = format!("memory-{}", inner.applied_updates.len());
        info!(record_id = %request.record, %signature, "applied update in memory ledger");

        Ok(Confirmation::new(signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UpdateParams;

    fn request_for(id: &str) -> UpdateRequest {
        UpdateRequest {
            record: id.into(),
            vault_a: "vault-a".into(),
            vault_b: "vault-b".into(),
            authority: "authority".to_string(),
            params: UpdateParams::new(10, 10),
        }
    }

    #[tokio::test]
    async fn lists_only_requested_kind() {
        let mut user_record = RemoteRecord::pool("user-1", "x", "y");
        user_record.kind = RecordKind::UserPoolLiquidity;
        let ledger =
            MemoryLedger::with_records(vec![RemoteRecord::pool("pool-1", "a", "b"), user_record]);

        let pools = ledger.list_records(RecordKind::PoolState).await.unwrap();

        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].id.as_str(), "pool-1");
    }

    #[tokio::test]
    async fn rejects_update_for_unknown_record() {
        let ledger = MemoryLedger::new();

        let err = ledger.apply_update(&request_for("missing")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::LedgerRejected);
        assert!(ledger.applied_updates().await.is_empty());
    }

    #[tokio::test]
    async fn records_applied_updates_in_order() {
        let ledger = MemoryLedger::with_records(vec![
            RemoteRecord::pool("pool-1", "a", "b"),
            RemoteRecord::pool("pool-2", "c", "d"),
        ]);

        let first = ledger.apply_update(&request_for("pool-2")).await.unwrap();
        let second = ledger.apply_update(&request_for("pool-1")).await.unwrap();

        assert_eq!(first.signature, "memory-1");
        assert_eq!(second.signature, "memory-2");
        let applied: Vec<String> = ledger
            .applied_updates()
            .await
            .into_iter()
            .map(|request| request.record.into_inner())
            .collect();
        assert_eq!(applied, vec!["pool-2", "pool-1"]);
        assert!(
            ledger
                .fetch_record(&"pool-1".into())
                .await
                .unwrap()
                .is_some()
        );
    }
}
