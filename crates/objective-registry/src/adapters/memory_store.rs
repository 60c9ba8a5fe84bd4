//! # In-Memory Store
//!
//! `RemoteStore` implementation backed by a `HashMap`, for tests and local
//! runs. Production deployments put a chain-backed store behind the same port.
//!
//! Fault injection: the store can be marked unavailable, made to reject every
//! write, or made to reject writes to specific keys.

use crate::errors::StoreError;
use crate::ports::outbound::RemoteStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Address reported by a store built with [`InMemoryStore::new`].
pub const DEFAULT_STORE_ADDRESS: &str = "0x0000000000000000000000000000000000000b0b";

/// In-memory key-value store.
#[derive(Debug)]
pub struct InMemoryStore {
    address: String,
    entries: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
    /// When set, every write fails with this reason.
    reject_all: RwLock<Option<String>>,
    /// Keys whose writes fail.
    rejected_keys: RwLock<HashSet<String>>,
    writes: AtomicUsize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_address(DEFAULT_STORE_ADDRESS)
    }

    /// Create an empty store reporting `address`.
    #[must_use]
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            reject_all: RwLock::new(None),
            rejected_keys: RwLock::new(HashSet::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Toggle the availability probe. An unavailable store fails every call.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Reject every subsequent write with `reason`; `None` clears it.
    pub fn reject_writes(&self, reason: Option<&str>) {
        *self.reject_all.write().unwrap_or_else(PoisonError::into_inner) =
            reason.map(str::to_string);
    }

    /// Reject writes to `key` until [`InMemoryStore::accept_key`] is called.
    pub fn reject_key(&self, key: &str) {
        self.rejected_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    /// Undo [`InMemoryStore::reject_key`].
    pub fn accept_key(&self, key: &str) {
        self.rejected_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Raw bytes under `key`, bypassing availability checks.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store raw bytes, bypassing fault injection. Used to seed corrupt data.
    pub fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of keys holding data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    fn check_write_allowed(&self, key: &str) -> Result<(), StoreError> {
        if let Some(reason) = self
            .reject_all
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Err(StoreError::Rejected(reason.clone()));
        }

        if self
            .rejected_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
        {
            return Err(StoreError::Rejected(format!("write to {key} refused")));
        }

        Ok(())
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::Transport("store lock poisoned".into()))?
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.check_write_allowed(key)?;

        self.entries
            .write()
            .map_err(|_| StoreError::Transport("store lock poisoned".into()))?
            .insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn address(&self) -> Result<String, StoreError> {
        self.ensure_available()?;
        Ok(self.address.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
