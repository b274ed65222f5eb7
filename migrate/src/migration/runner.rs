use std::fmt;
use tracing::{debug, error, info, warn};

use crate::context::RuntimeContext;
use crate::error::MigrateResult;
use crate::ledger::LedgerClient;
use crate::migration::{RecordMigrator, RemoteDirectory};
use crate::store::{CheckpointSet, CheckpointStore};
use crate::types::{
    MigrationOutcome, RecordIdentifier, RecordKind, RemoteRecord, RunReport, UpdateParams,
};

/// Phases a run moves through.
///
/// `Checking`, `Applying` and `Recording` repeat once per listed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Init,
    Listing,
    Checking,
    Applying,
    Recording,
    Done,
}

impl RunPhase {
    fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Init => "init",
            RunPhase::Listing => "listing",
            RunPhase::Checking => "checking",
            RunPhase::Applying => "applying",
            RunPhase::Recording => "recording",
            RunPhase::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one migration run over every record of a kind.
///
/// A run loads the checkpoint, lists the whole remote directory and then walks the
/// listing in order, one remote mutation at a time. Records already in the
/// checkpoint are skipped; every confirmed update is checkpointed before the next
/// record is touched. Only a corrupt checkpoint or a failed listing abort the run,
/// and both happen before any mutation. Per-record failures are reported in the
/// [`RunReport`] and left for the next run.
#[derive(Debug)]
pub struct MigrationRunner<C, S> {
    directory: RemoteDirectory<C>,
    migrator: RecordMigrator<C>,
    store: S,
    kind: RecordKind,
    params: UpdateParams,
}

impl<C, S> MigrationRunner<C, S>
where
    C: LedgerClient + Clone,
    S: CheckpointStore,
{
    pub fn new(
        context: RuntimeContext<C>,
        store: S,
        kind: RecordKind,
        params: UpdateParams,
    ) -> Self {
        Self {
            directory: RemoteDirectory::new(context.clone()),
            migrator: RecordMigrator::new(context),
            store,
            kind,
            params,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn params(&self) -> UpdateParams {
        self.params
    }

    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn run(&self) -> MigrateResult<RunReport> {
        let (mut checkpoint, records) = self.prepare().await?;

        info!(
            listed = records.len(),
            already_migrated = checkpoint.len(),
            "starting migration run"
        );

        let mut report = RunReport::new();
        for record in &records {
            let outcome = self.process_record(&mut checkpoint, record).await;
            report.push(record.id.clone(), outcome);
        }

        self.enter(RunPhase::Done);
        let summary = report.summary();
        info!(
            skipped = summary.skipped,
            applied = summary.applied,
            failed = summary.failed,
            unrecorded = summary.unrecorded,
            "migration run finished"
        );

        Ok(report)
    }

    /// Returns the identifiers a run would try to migrate, in directory order.
    ///
    /// Nothing is mutated and the checkpoint is only read.
    pub async fn plan(&self) -> MigrateResult<Vec<RecordIdentifier>> {
        let (checkpoint, records) = self.prepare().await?;

        let pending = records
            .into_iter()
            .filter(|record| !checkpoint.contains(record.id.as_str()))
            .map(|record| record.id)
            .collect::<Vec<_>>();

        info!(pending = pending.len(), "computed pending records");

        Ok(pending)
    }

    async fn prepare(&self) -> MigrateResult<(CheckpointSet, Vec<RemoteRecord>)> {
        self.enter(RunPhase::Init);
        let checkpoint = self.store.load().await?;

        self.enter(RunPhase::Listing);
        let records = self.directory.list_all(self.kind).await?;

        Ok((checkpoint, records))
    }

    async fn process_record(
        &self,
        checkpoint: &mut CheckpointSet,
        record: &RemoteRecord,
    ) -> MigrationOutcome {
        let record_id = &record.id;

        self.enter(RunPhase::Checking);
        if checkpoint.contains(record_id.as_str()) {
            info!(%record_id, "record already migrated, skipping");
            return MigrationOutcome::Skipped;
        }

        self.enter(RunPhase::Applying);
        let confirmation = match self.migrator.migrate(record, self.params).await {
            Ok(confirmation) => confirmation,
            Err(err) => {
                warn!(%record_id, error = %err, "record migration failed, it stays pending");
                return MigrationOutcome::Failed(err);
            }
        };

        self.enter(RunPhase::Recording);
        if let Err(err) = self.store.append(checkpoint, record_id.clone()).await {
            error!(
                %record_id,
                signature = %confirmation,
                error = %err,
                "record was updated but not checkpointed, only a later flush in this run persists it"
            );
            return MigrationOutcome::Unrecorded(confirmation, err);
        }

        info!(%record_id, signature = %confirmation, "record migrated");

        MigrationOutcome::Applied(confirmation)
    }

    fn enter(&self, phase: RunPhase) {
        debug!(%phase, "entering run phase");
    }
}
