//! Helpers shared by unit and integration tests.

pub mod ledger;
pub mod record;
pub mod store;
