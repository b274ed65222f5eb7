use serde::{Deserialize, Serialize};

use crate::shared::{CheckpointConfig, LedgerConfig, MigrationConfig, ValidationError};

/// Complete configuration for the `migrator` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MigratorConfig {
    /// Ledger backend to read from and write to.
    pub ledger: LedgerConfig,
    /// Durable progress file.
    pub checkpoint: CheckpointConfig,
    /// Records and parameters of the update.
    pub migration: MigrationConfig,
}

impl MigratorConfig {
    /// Validates every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ledger.validate()?;
        self.checkpoint.validate()?;
        self.migration.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::RecordKind;

    fn rpc_config(endpoint: &str, authority: &str, request_timeout_ms: u64) -> MigratorConfig {
        MigratorConfig {
            ledger: LedgerConfig::Rpc {
                endpoint: endpoint.to_string(),
                authority: authority.to_string(),
                auth_token: None,
                request_timeout_ms,
            },
            checkpoint: CheckpointConfig {
                path: "scripts/poolDataMigration.json".into(),
            },
            migration: MigrationConfig {
                kind: RecordKind::PoolState,
                param: 10,
                value: 10,
            },
        }
    }

    #[test]
    fn valid_rpc_config_passes() {
        let config = rpc_config("http://localhost:8899", "Authority1111", 1_000);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_blank_endpoint_and_authority() {
        assert_eq!(
            rpc_config("  ", "Authority1111", 1_000).validate(),
            Err(ValidationError::EmptyEndpoint)
        );
        assert_eq!(
            rpc_config("http://localhost:8899", "", 1_000).validate(),
            Err(ValidationError::EmptyAuthority)
        );
        assert_eq!(
            rpc_config("http://localhost:8899", "Authority1111", 0).validate(),
            Err(ValidationError::ZeroRequestTimeout)
        );
    }

    #[test]
    fn rejects_non_pool_migration_kind() {
        let mut config = rpc_config("http://localhost:8899", "Authority1111", 1_000);
        config.migration.kind = RecordKind::UserPoolLiquidity;

        assert_eq!(
            config.validate(),
            Err(ValidationError::UnsupportedMigrationKind(
                "user_pool_liquidity".to_string()
            ))
        );
    }

    #[test]
    fn deserializes_externally_tagged_ledger() {
        let json = r#"{
            "ledger": { "rpc": { "endpoint": "http://localhost:8899", "authority": "Auth" } },
            "checkpoint": { "path": "progress.json" },
            "migration": { "kind": "pool_state", "param": 10, "value": 10 }
        }"#;

        let config: MigratorConfig = serde_json::from_str(json).unwrap();

        match config.ledger {
            LedgerConfig::Rpc {
                request_timeout_ms,
                auth_token,
                ..
            } => {
                assert_eq!(request_timeout_ms, 30_000);
                assert!(auth_token.is_none());
            }
            LedgerConfig::Memory => panic!("expected rpc ledger"),
        }
        assert_eq!(config.migration.kind, RecordKind::PoolState);
    }
}
