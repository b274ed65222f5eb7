use std::future::Future;

use crate::error::MigrateResult;
use crate::types::{Confirmation, RecordIdentifier, RecordKind, RemoteRecord, UpdateRequest};

/// Remote ledger as seen by the migration.
///
/// Implementations report failures with their own error kinds; the directory and the
/// migrator decide whether a failure is fatal for the run or only for one record.
pub trait LedgerClient {
    /// Returns every record of `kind` that exists at call time.
    fn list_records(
        &self,
        kind: RecordKind,
    ) -> impl Future<Output = MigrateResult<Vec<RemoteRecord>>> + Send;

    /// Reads a single record, returning [`None`] if the address holds no record.
    fn fetch_record(
        &self,
        id: &RecordIdentifier,
    ) -> impl Future<Output = MigrateResult<Option<RemoteRecord>>> + Send;

    /// Submits one update and waits for the ledger to confirm it.
    fn apply_update(
        &self,
        request: &UpdateRequest,
    ) -> impl Future<Output = MigrateResult<Confirmation>> + Send;
}
