//! The checkpointed migration loop and the two ledger-facing components it drives.

mod directory;
mod migrator;
mod runner;

pub use directory::RemoteDirectory;
pub use migrator::RecordMigrator;
pub use runner::MigrationRunner;
