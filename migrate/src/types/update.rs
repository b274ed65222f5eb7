use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::RecordIdentifier;

/// Target parameters of the pool update.
///
/// The same values are sent on every invocation so that applying the update twice
/// converges to the same pool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateParams {
    pub param: u32,
    pub value: u64,
}

/// Parameter slot updated on every pool.
pub const DEFAULT_UPDATE_PARAM: u32 = 10;
/// Value written into [`DEFAULT_UPDATE_PARAM`].
pub const DEFAULT_UPDATE_VALUE: u64 = 10;

impl UpdateParams {
    pub fn new(param: u32, value: u64) -> Self {
        Self { param, value }
    }
}

impl Default for UpdateParams {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_PARAM, DEFAULT_UPDATE_VALUE)
    }
}

/// Fully built remote update for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub record: RecordIdentifier,
    pub vault_a: RecordIdentifier,
    pub vault_b: RecordIdentifier,
    pub authority: String,
    pub params: UpdateParams,
}

/// Acknowledgement returned by the ledger for an applied update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Transaction signature of the confirmed update.
    pub signature: String,
}

impl Confirmation {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)
    }
}
