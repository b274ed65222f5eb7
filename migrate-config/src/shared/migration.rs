use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::ValidationError;

/// Family of ledger accounts that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Pool accounts, the target of the migration.
    PoolState,
    /// Per-user liquidity positions, listed for diagnostics only.
    UserPoolLiquidity,
}

impl RecordKind {
    /// Returns the snake case name used on the wire and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::PoolState => "pool_state",
            RecordKind::UserPoolLiquidity => "user_pool_liquidity",
        }
    }

    /// Returns `true` if records of this kind can be migrated.
    pub fn is_migratable(&self) -> bool {
        matches!(self, RecordKind::PoolState)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of the migration: which records and which update to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Kind of record to enumerate and update.
    pub kind: RecordKind,
    /// Selector of the pool field being updated.
    pub param: u32,
    /// Value written for `param`; identical on every invocation.
    pub value: u64,
}

impl MigrationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.kind.is_migratable() {
            return Err(ValidationError::UnsupportedMigrationKind(
                self.kind.to_string(),
            ));
        }

        Ok(())
    }
}
