use crate::types::RemoteRecord;

/// Builds a pool record whose vaults are derived from `id`.
pub fn pool(id: &str) -> RemoteRecord {
    RemoteRecord::pool(id, format!("{id}-vault-a"), format!("{id}-vault-b"))
}

/// Builds pool records for every id, in order.
pub fn pools<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<RemoteRecord> {
    ids.into_iter().map(pool).collect()
}
