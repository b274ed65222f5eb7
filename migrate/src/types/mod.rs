//! Common types used throughout the migration.

mod outcome;
mod record;
mod update;

pub use outcome::*;
pub use record::*;
pub use update::*;

// Re-exports.
pub use migrate_config::shared::RecordKind;
