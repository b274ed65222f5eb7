use clap::{Parser, Subcommand, ValueEnum};
use migrate::types::RecordKind;
use migrate_telemetry::tracing::init_tracing;
use tracing::error;

use crate::config::load_migrator_config;
use crate::core::start_migrator_with_config;

mod config;
mod core;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Checkpointed migration of ledger pool accounts",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum KindArg {
    /// Pool accounts
    PoolState,
    /// Per-user liquidity positions
    UserPoolLiquidity,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::PoolState => RecordKind::PoolState,
            KindArg::UserPoolLiquidity => RecordKind::UserPoolLiquidity,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Migrate every pending record and print the run summary
    Run,
    /// Print the identifiers a run would migrate, one per line
    Plan,
    /// Dump every record of a kind as JSON
    List {
        /// Kind of record to list, defaults to the configured migration kind
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print a single record as JSON
    Show {
        /// Address of the record
        address: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let migrator_config = load_migrator_config()?;

    let run_id = uuid::Uuid::new_v4().to_string();
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"), Some(run_id))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(migrator_config, args.command))?;

    Ok(())
}

async fn async_main(
    migrator_config: migrate_config::shared::MigratorConfig,
    command: Command,
) -> anyhow::Result<()> {
    if let Err(err) = start_migrator_with_config(migrator_config, command).await {
        error!("an error occurred in the migrator: {err}");

        return Err(err);
    }

    Ok(())
}
