//! Durable record of which remote records were already migrated.
//!
//! A [`CheckpointStore`] owns a [`CheckpointSet`]: identifiers whose update the ledger
//! confirmed at least once. The store is loaded once per run and rewritten in full after
//! every confirmed update.
//!
//! - [`file`] - JSON file rewritten atomically, the production store
//! - [`memory`] - in-process store for tests and rehearsals

mod base;
pub mod file;
pub mod memory;

pub use base::{CheckpointSet, CheckpointStore};
