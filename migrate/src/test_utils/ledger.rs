use std::collections::HashSet;
use std::sync::Arc;

use crate::bail;
use crate::error::{ErrorKind, MigrateResult};
use crate::ledger::LedgerClient;
use crate::types::{Confirmation, RecordIdentifier, RecordKind, RemoteRecord, UpdateRequest};

#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    pub fail_list_records: bool,
    pub fail_fetch_record: bool,
    pub fail_apply_for: HashSet<String>,
}

impl FaultConfig {
    pub fn fail_apply_for<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            fail_apply_for: ids.into_iter().map(str::to_string).collect(),
            ..Default::default()
        }
    }
}

/// Ledger wrapper that fails selected calls before they reach the inner ledger.
#[derive(Debug, Clone)]
pub struct FaultInjectingLedger<L> {
    inner: L,
    config: Arc<FaultConfig>,
}

impl<L> FaultInjectingLedger<L> {
    pub fn wrap(inner: L, config: FaultConfig) -> Self {
        Self {
            inner,
            config: Arc::new(config),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L> LedgerClient for FaultInjectingLedger<L>
where
    L: LedgerClient + Sync,
{
    async fn list_records(&self, kind: RecordKind) -> MigrateResult<Vec<RemoteRecord>> {
        if self.config.fail_list_records {
            bail!(
                ErrorKind::LedgerRequestFailed,
                "Injected listing failure",
                kind
            );
        }

        self.inner.list_records(kind).await
    }

    async fn fetch_record(&self, id: &RecordIdentifier) -> MigrateResult<Option<RemoteRecord>> {
        if self.config.fail_fetch_record {
            bail!(ErrorKind::LedgerRequestFailed, "Injected fetch failure", id);
        }

        self.inner.fetch_record(id).await
    }

    async fn apply_update(&self, request: &UpdateRequest) -> MigrateResult<Confirmation> {
        if self.config.fail_apply_for.contains(request.record.as_str()) {
            bail!(
                ErrorKind::LedgerRejected,
                "Injected update rejection",
                request.record
            );
        }

        self.inner.apply_update(request).await
    }
}
