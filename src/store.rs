//! Interfaces for the key/value store that keeps match records.
//!
//! The store itself (connection handling, ordering of records by id or
//! timestamp, retries) lives outside this crate. Implementors exchange
//! records in the binary form produced by [`MatchRecord::to_bytes`].

use crate::record::MatchRecord;
use crate::Result;

/// Write side of a record store.
pub trait RecordMutationClient: Send + Sync {
    /// Insert the record under `key`, replacing any record already there.
    fn add_or_update(&self, key: &str, record: &MatchRecord) -> Result<()>;
}

/// Read side of a record store.
pub trait RecordQueryClient: Send + Sync {
    /// Fetch the record stored under `key`.
    ///
    /// Returns `Ok(None)` when no record exists for the key.
    fn get(&self, key: &str) -> Result<Option<MatchRecord>>;
}
