use migrate::context::RuntimeContext;
use migrate::ledger::LedgerClient;
use migrate::ledger::memory::MemoryLedger;
use migrate::ledger::rpc::RpcLedgerClient;
use migrate::migration::{MigrationRunner, RemoteDirectory};
use migrate::store::file::FileCheckpointStore;
use migrate::types::{MigrationOutcome, RecordIdentifier, RecordKind, UpdateParams};
use migrate_config::shared::{CheckpointConfig, LedgerConfig, MigrationConfig, MigratorConfig};
use secrecy::SecretString;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::Command;

/// Authority reported for updates applied to the in-memory ledger.
const MEMORY_LEDGER_AUTHORITY: &str = "memory-authority";

/// Builds the ledger client described by the configuration and executes `command`.
///
/// Only the connection differs between ledger backends, so every command goes through
/// the same generic [`execute`] once the client is built.
pub async fn start_migrator_with_config(
    migrator_config: MigratorConfig,
    command: Command,
) -> anyhow::Result<()> {
    info!("starting migrator");

    log_config(&migrator_config);

    match &migrator_config.ledger {
        LedgerConfig::Memory => {
            warn!("using the in-memory ledger, no remote account will be touched");

            let context = RuntimeContext::new(MemoryLedger::new(), MEMORY_LEDGER_AUTHORITY);
            execute(context, &migrator_config, command).await?;
        }
        LedgerConfig::Rpc {
            endpoint,
            authority,
            auth_token,
            request_timeout_ms,
        } => {
            let auth_token: Option<SecretString> = auth_token.clone().map(Into::into);
            let client = RpcLedgerClient::new(
                endpoint.clone(),
                auth_token,
                Duration::from_millis(*request_timeout_ms),
            )?;

            let context = RuntimeContext::new(client, authority.clone());
            execute(context, &migrator_config, command).await?;
        }
    }

    info!("migrator completed");

    Ok(())
}

async fn execute<C>(
    context: RuntimeContext<C>,
    migrator_config: &MigratorConfig,
    command: Command,
) -> anyhow::Result<()>
where
    C: LedgerClient + Clone,
{
    let migration = &migrator_config.migration;

    match command {
        Command::Run => {
            let store = init_store(&migrator_config.checkpoint).await?;
            let runner = MigrationRunner::new(
                context,
                store,
                migration.kind,
                UpdateParams::new(migration.param, migration.value),
            );

            let params = runner.params();
            info!(
                kind = %runner.kind(),
                param = params.param,
                value = params.value,
                "running migration"
            );

            let report = runner.run().await?;
            for (id, outcome) in report.outcomes() {
                match outcome {
                    MigrationOutcome::Failed(err) => println!("failed {id}: {err}"),
                    MigrationOutcome::Unrecorded(confirmation, err) => {
                        println!("unrecorded {id} ({confirmation}): {err}")
                    }
                    MigrationOutcome::Skipped | MigrationOutcome::Applied(_) => {}
                }
            }
            println!("{}", report.summary());
        }
        Command::Plan => {
            let store = FileCheckpointStore::new(&migrator_config.checkpoint.path);
            let runner = MigrationRunner::new(
                context,
                store,
                migration.kind,
                UpdateParams::new(migration.param, migration.value),
            );

            for id in runner.plan().await? {
                println!("{id}");
            }
        }
        Command::List { kind } => {
            let kind = kind.map(RecordKind::from).unwrap_or(migration.kind);
            let records = RemoteDirectory::new(context).list_all(kind).await?;

            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Show { address } => {
            let id = RecordIdentifier::new(address);
            let Some(record) = RemoteDirectory::new(context).fetch(&id).await? else {
                anyhow::bail!("no record found at {id}");
            };

            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

/// Opens the checkpoint file, creating an empty one on first use.
async fn init_store(config: &CheckpointConfig) -> anyhow::Result<FileCheckpointStore> {
    let store = FileCheckpointStore::new(&config.path);

    if store.create_if_missing().await? {
        info!(path = %config.path.display(), "initialized checkpoint file");
    }

    Ok(store)
}

fn log_config(config: &MigratorConfig) {
    log_ledger_config(&config.ledger);
    log_checkpoint_config(&config.checkpoint);
    log_migration_config(&config.migration);
}

fn log_ledger_config(config: &LedgerConfig) {
    match config {
        LedgerConfig::Memory => {
            debug!("using memory ledger config");
        }
        LedgerConfig::Rpc {
            endpoint,
            authority,
            auth_token,
            request_timeout_ms,
        } => {
            debug!(
                endpoint,
                authority,
                authenticated = auth_token.is_some(),
                request_timeout_ms,
                "using rpc ledger config"
            )
        }
    }
}

fn log_checkpoint_config(config: &CheckpointConfig) {
    debug!(path = %config.path.display(), "checkpoint config");
}

fn log_migration_config(config: &MigrationConfig) {
    debug!(
        kind = %config.kind,
        param = config.param,
        value = config.value,
        "migration config"
    );
}
