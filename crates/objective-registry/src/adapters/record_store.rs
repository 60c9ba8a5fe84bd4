//! # Record Store Adapter
//!
//! Translates registry operations into `get`/`set` calls on a [`RemoteStore`]
//! and owns maintenance of the index.
//!
//! ## Key Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `objective_keys` | JSON array of ids, unique |
//! | `objective_<id>` | JSON [`ObjectiveRecord`] |
//!
//! Malformed data is never an error here: an unreadable index is an empty
//! index and an unreadable record is an absent record, each with a `warn!`.
//! Transport failures are still surfaced.

use crate::domain::entities::{Objective, ObjectiveRecord};
use crate::domain::invariants::check_index_unique;
use crate::domain::value_objects::ObjectiveId;
use crate::errors::{RegistryError, StoreError};
use crate::metrics;
use crate::ports::outbound::RemoteStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default key holding the index.
pub const DEFAULT_INDEX_KEY: &str = "objective_keys";

/// Default prefix of record keys.
pub const DEFAULT_RECORD_PREFIX: &str = "objective_";

/// Outcome of reading a single record.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordFetch {
    /// The record parsed.
    Found(Objective),
    /// Nothing is stored under the key.
    Missing,
    /// Bytes are present but are not a valid record.
    Malformed(String),
}

impl RecordFetch {
    /// The objective, if one was found.
    #[must_use]
    pub fn into_objective(self) -> Option<Objective> {
        match self {
            Self::Found(objective) => Some(objective),
            Self::Missing | Self::Malformed(_) => None,
        }
    }
}

/// Registry view over a flat key-value store.
pub struct RecordStore<S: RemoteStore> {
    store: Arc<S>,
    index_key: String,
    record_prefix: String,
}

impl<S: RemoteStore> Clone for RecordStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            index_key: self.index_key.clone(),
            record_prefix: self.record_prefix.clone(),
        }
    }
}

impl<S: RemoteStore> RecordStore<S> {
    /// Adapter using the default key layout.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_keys(store, DEFAULT_INDEX_KEY, DEFAULT_RECORD_PREFIX)
    }

    /// Adapter using a custom index key and record prefix.
    pub fn with_keys(
        store: Arc<S>,
        index_key: impl Into<String>,
        record_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            index_key: index_key.into(),
            record_prefix: record_prefix.into(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Key holding the index.
    pub fn index_key(&self) -> &str {
        &self.index_key
    }

    /// Key holding the record for `id`.
    pub fn record_key(&self, id: &ObjectiveId) -> String {
        format!("{}{}", self.record_prefix, id)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// All ids in the index, in stored order, each at most once.
    ///
    /// A missing, blank or malformed index yields an empty vector.
    pub async fn list_ids(&self) -> Result<Vec<ObjectiveId>, RegistryError> {
        let raw = self.get(&self.index_key).await?;
        Ok(self.parse_index(&raw))
    }

    /// Read and classify the record for `id`.
    pub async fn fetch_record(&self, id: &ObjectiveId) -> Result<RecordFetch, RegistryError> {
        let key = self.record_key(id);
        let raw = self.get(&key).await?;

        if is_blank(&raw) {
            debug!(key = %key, "No record stored");
            return Ok(RecordFetch::Missing);
        }

        match serde_json::from_slice::<ObjectiveRecord>(&raw) {
            Ok(record) => Ok(RecordFetch::Found(Objective::from_record(id.clone(), record))),
            Err(e) => {
                warn!(key = %key, error = %e, "Malformed objective record, treating as absent");
                Ok(RecordFetch::Malformed(e.to_string()))
            }
        }
    }

    /// The record for `id`, or `None` when missing or malformed.
    pub async fn read_record(&self, id: &ObjectiveId) -> Result<Option<Objective>, RegistryError> {
        Ok(self.fetch_record(id).await?.into_objective())
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Serialise and store `objective` under its record key.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::StoreUnavailable`] - Availability probe reported down
    /// * [`RegistryError::WriteRejected`] - The store refused the write
    pub async fn write_record(&self, objective: &Objective) -> Result<(), RegistryError> {
        let key = self.record_key(&objective.id);
        let bytes = serde_json::to_vec(&objective.to_record())
            .map_err(|e| RegistryError::Store(format!("record serialisation failed: {e}")))?;

        self.set(&key, bytes).await?;
        debug!(key = %key, status = %objective.status, "Record written");
        Ok(())
    }

    /// Append `id` to the index unless already present.
    ///
    /// Read-modify-write; a malformed existing index is replaced by `[id]`
    /// and duplicate entries are dropped on rewrite.
    /// Returns `true` if the index was written.
    pub async fn append_to_index(&self, id: &ObjectiveId) -> Result<bool, RegistryError> {
        let raw = self.get(&self.index_key).await?;
        let mut ids = self.parse_index(&raw);

        if ids.contains(id) {
            debug!(objective_id = %id, "Already indexed");
            return Ok(false);
        }
        ids.push(id.clone());

        let as_strings: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let bytes = serde_json::to_vec(&as_strings)
            .map_err(|e| RegistryError::Store(format!("index serialisation failed: {e}")))?;
        self.set(&self.index_key, bytes).await?;

        debug!(objective_id = %id, entries = ids.len(), "Index updated");
        Ok(true)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn parse_index(&self, raw: &[u8]) -> Vec<ObjectiveId> {
        if is_blank(raw) {
            return Vec::new();
        }

        match serde_json::from_slice::<Vec<String>>(raw) {
            Ok(mut ids) => {
                if !check_index_unique(&ids) {
                    warn!(key = %self.index_key, "Index holds duplicate ids, keeping first");
                    let mut seen = HashSet::new();
                    ids.retain(|entry| seen.insert(entry.clone()));
                }
                ids.into_iter().map(ObjectiveId::new).collect()
            }
            Err(e) => {
                warn!(
                    key = %self.index_key,
                    error = %e,
                    "Malformed index, treating as empty"
                );
                Vec::new()
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, RegistryError> {
        self.store.get(key).await.map_err(|e| self.store_failure(key, e))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), RegistryError> {
        if !self.store.is_available().await {
            return Err(self.store_failure(key, StoreError::Unavailable));
        }
        self.store
            .set(key, value)
            .await
            .map_err(|e| self.store_failure(key, e))
    }

    fn store_failure(&self, key: &str, err: StoreError) -> RegistryError {
        warn!(key = %key, error = %err, "Store call failed");
        metrics::record_store_failure(&err);
        RegistryError::from(err)
    }
}

fn is_blank(raw: &[u8]) -> bool {
    raw.iter().all(u8::is_ascii_whitespace)
}

// =============================================================================
// TESTS
// =============================================================================
