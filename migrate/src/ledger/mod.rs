mod base;
pub mod memory;
pub mod rpc;

pub use base::LedgerClient;
