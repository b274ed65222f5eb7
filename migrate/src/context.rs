//! Connection and identity handed to every component that talks to the ledger.

/// Explicitly constructed ledger connection and signing identity.
///
/// Built once by the caller and passed to the [`crate::migration::RemoteDirectory`]
/// and [`crate::migration::RecordMigrator`]; nothing in the crate reaches for a
/// process-wide client.
#[derive(Debug, Clone)]
pub struct RuntimeContext<C> {
    client: C,
    authority: String,
}

impl<C> RuntimeContext<C> {
    /// Creates a context from a ready ledger client and the address of the authority
    /// that signs every update.
    pub fn new(client: C, authority: impl Into<String>) -> Self {
        Self {
            client,
            authority: authority.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }
}
