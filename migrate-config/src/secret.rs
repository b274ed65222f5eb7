use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Serde-friendly wrapper around [`SecretString`].
///
/// Used for the ledger bearer token so it can be read from YAML or `APP_`
/// variables while never showing up in `Debug` output or logs.
#[derive(Clone)]
pub struct SerializableSecretString(SecretString);

impl fmt::Debug for SerializableSecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerializableSecretString([REDACTED])")
    }
}

impl Deref for SerializableSecretString {
    type Target = SecretString;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for SerializableSecretString {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<SerializableSecretString> for SecretString {
    fn from(value: SerializableSecretString) -> Self {
        value.0
    }
}

impl Serialize for SerializableSecretString {
    /// Exposes the secret only for the duration of serialization.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for SerializableSecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Ok(Self(string.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_token() {
        let secret = SerializableSecretString::from("super-secret-token".to_string());

        let debug = format!("{secret:?}");

        assert!(!debug.contains("super-secret-token"));
        assert_eq!(secret.expose_secret(), "super-secret-token");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let secret: SerializableSecretString = serde_json::from_str("\"abc\"").unwrap();

        assert_eq!(secret.expose_secret(), "abc");
    }
}
