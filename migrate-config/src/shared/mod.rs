mod base;
mod checkpoint;
mod ledger;
mod migration;
mod migrator;

pub use base::*;
pub use checkpoint::*;
pub use ledger::*;
pub use migration::*;
pub use migrator::*;
