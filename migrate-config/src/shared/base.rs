use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The ledger RPC endpoint is blank.
    #[error("`ledger.rpc.endpoint` cannot be empty")]
    EmptyEndpoint,
    /// No signing authority was configured.
    #[error("`ledger.rpc.authority` cannot be empty")]
    EmptyAuthority,
    /// A zero timeout would fail every request.
    #[error("`ledger.rpc.request_timeout_ms` cannot be zero")]
    ZeroRequestTimeout,
    /// The checkpoint file location is blank.
    #[error("`checkpoint.path` cannot be empty")]
    EmptyCheckpointPath,
    /// Only pool accounts carry the vaults needed to build the update.
    #[error("`migration.kind` must be `pool_state`, got `{0}`")]
    UnsupportedMigrationKind(String),
}
