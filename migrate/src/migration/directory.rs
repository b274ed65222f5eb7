use tracing::info;

use crate::context::RuntimeContext;
use crate::error::{ErrorKind, MigrateResult};
use crate::ledger::LedgerClient;
use crate::types::{RecordIdentifier, RecordKind, RemoteRecord};

/// Read path of the migration.
///
/// Any failure while reading is [`ErrorKind::RemoteUnavailable`]: an incomplete
/// listing would silently skip records, so there is no partial result.
#[derive(Debug, Clone)]
pub struct RemoteDirectory<C> {
    context: RuntimeContext<C>,
}

impl<C> RemoteDirectory<C>
where
    C: LedgerClient,
{
    pub fn new(context: RuntimeContext<C>) -> Self {
        Self { context }
    }

    /// Lists every record of `kind` in a single bulk read.
    pub async fn list_all(&self, kind: RecordKind) -> MigrateResult<Vec<RemoteRecord>> {
        let records = self
            .context
            .client()
            .list_records(kind)
            .await
            .map_err(|err| {
                err.reclassify(ErrorKind::RemoteUnavailable, "Listing remote records failed")
            })?;

        info!(%kind, count = records.len(), "listed remote records");

        Ok(records)
    }

    /// Reads the current state of a single record.
    pub async fn fetch(&self, id: &RecordIdentifier) -> MigrateResult<Option<RemoteRecord>> {
        self.context
            .client()
            .fetch_record(id)
            .await
            .map_err(|err| {
                err.reclassify(ErrorKind::RemoteUnavailable, "Fetching remote record failed")
            })
    }
}
