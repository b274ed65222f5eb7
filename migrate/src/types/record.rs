use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::types::RecordKind;

/// Stable, printable key of a remote record, typically an account address.
///
/// Two identifiers are equal only if their strings are byte-for-byte equal; no
/// normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordIdentifier(String);

impl RecordIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for RecordIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecordIdentifier {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for RecordIdentifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one remote record as returned by the ledger.
///
/// Pool records reference their two token vaults, which the update must pass
/// along; other kinds leave them empty. `data` holds the decoded account as
/// returned by the ledger and is only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: RecordIdentifier,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_a: Option<RecordIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_b: Option<RecordIdentifier>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RemoteRecord {
    /// Creates a pool record referencing both of its vaults.
    pub fn pool(
        id: impl Into<RecordIdentifier>,
        vault_a: impl Into<RecordIdentifier>,
        vault_b: impl Into<RecordIdentifier>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RecordKind::PoolState,
            vault_a: Some(vault_a.into()),
            vault_b: Some(vault_b.into()),
            data: serde_json::Value::Null,
        }
    }

    /// Returns both vault references if the record has them.
    pub fn vaults(&self) -> Option<(&RecordIdentifier, &RecordIdentifier)> {
        self.vault_a.as_ref().zip(self.vault_b.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_serializes_as_plain_string() {
        let id = RecordIdentifier::new("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU");

        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, "\"7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU\"");
    }

    #[test]
    fn identifier_equality_is_exact() {
        assert_ne!(RecordIdentifier::new("abc"), RecordIdentifier::new("ABC"));
        assert_ne!(RecordIdentifier::new("abc"), RecordIdentifier::new("abc "));
    }

    #[test]
    fn record_without_vaults_deserializes() {
        let json = r#"{
            "id": "user-1",
            "kind": "user_pool_liquidity",
            "data": { "lp_tokens_owned": 5 }
        }"#;

        let record: RemoteRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.kind, RecordKind::UserPoolLiquidity);
        assert!(record.vaults().is_none());
        assert_eq!(record.data["lp_tokens_owned"], 5);
    }
}
