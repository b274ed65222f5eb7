//! Checkpointed batch migration of ledger pool accounts.
//!
//! The crate enumerates remote records through a [`ledger::LedgerClient`], skips the
//! ones already listed in a [`store::CheckpointStore`], applies one idempotent update
//! per outstanding record and persists progress after every confirmed update.

pub mod context;
pub mod error;
pub mod ledger;
mod macros;
pub mod migration;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
