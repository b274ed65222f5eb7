use tracing::debug;

use crate::context::RuntimeContext;
use crate::error::{ErrorKind, MigrateResult};
use crate::ledger::LedgerClient;
use crate::migrate_error;
use crate::types::{Confirmation, RemoteRecord, UpdateParams, UpdateRequest};

/// Applies the pool update to one record.
///
/// Every failure, whether the record cannot be turned into a request or the ledger
/// refuses it, is reported as [`ErrorKind::MigrationFailed`] carrying the original
/// diagnostic. There are no retries here; the next run picks the record up again.
#[derive(Debug, Clone)]
pub struct RecordMigrator<C> {
    context: RuntimeContext<C>,
}

impl<C> RecordMigrator<C>
where
    C: LedgerClient,
{
    pub fn new(context: RuntimeContext<C>) -> Self {
        Self { context }
    }

    /// Builds the update for `record`.
    ///
    /// The request only depends on the record's vaults, the context authority and
    /// `params`, so repeated calls for the same record produce the same update.
    pub fn build_request(
        &self,
        record: &RemoteRecord,
        params: UpdateParams,
    ) -> MigrateResult<UpdateRequest> {
        if !record.kind.is_migratable() {
            return Err(migrate_error!(
                ErrorKind::MigrationFailed,
                "Record kind cannot be migrated",
                format!("{} is a {} record", record.id, record.kind)
            ));
        }

        let Some((vault_a, vault_b)) = record.vaults() else {
            return Err(migrate_error!(
                ErrorKind::MigrationFailed,
                "Record is missing vault references",
                record.id
            ));
        };

        Ok(UpdateRequest {
            record: record.id.clone(),
            vault_a: vault_a.clone(),
            vault_b: vault_b.clone(),
            authority: self.context.authority().to_string(),
            params,
        })
    }

    /// Applies the update to `record` and waits for the ledger's confirmation.
    pub async fn migrate(
        &self,
        record: &RemoteRecord,
        params: UpdateParams,
    ) -> MigrateResult<Confirmation> {
        let request = self.build_request(record, params)?;

        debug!(
            record_id = %request.record,
            param = params.param,
            value = params.value,
            "applying remote update"
        );

        self.context
            .client()
            .apply_update(&request)
            .await
            .map_err(|err| err.reclassify(ErrorKind::MigrationFailed, "Remote update failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::MemoryLedger;
    use crate::types::RecordKind;

    fn migrator(ledger: MemoryLedger) -> RecordMigrator<MemoryLedger> {
        RecordMigrator::new(RuntimeContext::new(ledger, "Authority1111"))
    }

    #[tokio::test]
    async fn sends_vaults_authority_and_params() {
        let ledger = MemoryLedger::with_records(vec![RemoteRecord::pool("A", "va", "vb")]);
        let record = RemoteRecord::pool("A", "va", "vb");

        let confirmation = migrator(ledger.clone())
            .migrate(&record, UpdateParams::new(10, 10))
            .await
            .unwrap();

        assert_eq!(confirmation.signature, "memory-1");
        let applied = ledger.applied_updates().await;
        assert_eq!(
            applied,
            vec![UpdateRequest {
                record: "A".into(),
                vault_a: "va".into(),
                vault_b: "vb".into(),
                authority: "Authority1111".to_string(),
                params: UpdateParams::new(10, 10),
            }]
        );
    }

    #[test]
    fn same_record_builds_same_request() {
        let migrator = migrator(MemoryLedger::new());
        let record = RemoteRecord::pool("A", "va", "vb");

        let first = migrator
            .build_request(&record, UpdateParams::new(10, 10))
            .unwrap();
        let second = migrator
            .build_request(&record, UpdateParams::new(10, 10))
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_vault_fails_without_contacting_ledger() {
        let mut record = RemoteRecord::pool("A", "va", "vb");
        record.vault_b = None;
        let ledger = MemoryLedger::with_records(vec![record.clone()]);

        let err = migrator(ledger.clone())
            .migrate(&record, UpdateParams::new(10, 10))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MigrationFailed);
        assert_eq!(err.description(), "Record is missing vault references");
        assert!(ledger.applied_updates().await.is_empty());
    }

    #[tokio::test]
    async fn non_pool_record_is_rejected() {
        let mut record = RemoteRecord::pool("A", "va", "vb");
        record.kind = RecordKind::UserPoolLiquidity;

        let err = migrator(MemoryLedger::with_records(vec![record.clone()]))
            .migrate(&record, UpdateParams::new(10, 10))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MigrationFailed);
    }

    #[tokio::test]
    async fn ledger_rejection_becomes_migration_failure_with_detail() {
        let record = RemoteRecord::pool("ghost", "va", "vb");

        let err = migrator(MemoryLedger::new())
            .migrate(&record, UpdateParams::new(10, 10))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MigrationFailed);
        assert!(err.detail().unwrap().contains("Record does not exist"));
    }
}
