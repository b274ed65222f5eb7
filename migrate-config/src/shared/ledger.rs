use serde::{Deserialize, Serialize};

use crate::SerializableSecretString;
use crate::shared::ValidationError;

/// Default deadline for a single ledger request.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Which ledger backend the migrator talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerConfig {
    /// In-process ledger with no records, useful to rehearse a configuration.
    Memory,
    /// JSON-RPC gateway in front of the ledger program.
    Rpc {
        /// HTTP(S) URL of the gateway.
        endpoint: String,
        /// Public address of the signing authority used for every update.
        authority: String,
        /// Optional bearer token sent with every request.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_token: Option<SerializableSecretString>,
        /// Per-request deadline; an expired call counts as a failed request.
        #[serde(default = "default_request_timeout_ms")]
        request_timeout_ms: u64,
    },
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            LedgerConfig::Memory => Ok(()),
            LedgerConfig::Rpc {
                endpoint,
                authority,
                request_timeout_ms,
                ..
            } => {
                if endpoint.trim().is_empty() {
                    return Err(ValidationError::EmptyEndpoint);
                }
                if authority.trim().is_empty() {
                    return Err(ValidationError::EmptyAuthority);
                }
                if *request_timeout_ms == 0 {
                    return Err(ValidationError::ZeroRequestTimeout);
                }

                Ok(())
            }
        }
    }
}
