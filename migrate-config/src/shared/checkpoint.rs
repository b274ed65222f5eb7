use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::shared::ValidationError;

/// Location of the file that records already migrated accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Path to the JSON array of migrated record identifiers.
    pub path: PathBuf,
}

impl CheckpointConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyCheckpointPath);
        }

        Ok(())
    }
}
