//! # Snapshot Store
//!
//! The persistence boundary of the ledger. A store is a plain key-value map of
//! strings; the ledger lives under one fixed key as a JSON array.
//!
//! Every successful [`SnapshotStore::save`] publishes a [`SnapshotChanged`] event
//! on a broadcast channel. Sessions sharing a store listen on it and re-read the
//! snapshot when somebody else wrote it (last writer wins).
//!
//! ## Implementations
//!
//! - [`MemoryStore`] - process-local map, shared between sessions through an `Arc`
//! - [`FileStore`] - one JSON file per key inside a directory

pub mod file;
pub mod memory;

pub use file::*;
pub use memory::*;

use crate::error::OrderError;
use crate::ledger::Ledger;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default key of the order ledger snapshot.
pub const DEFAULT_LEDGER_KEY: &str = "smartqr_orders_v1";

/// Capacity of the change-notification channel.
pub(crate) const NOTIFY_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Identifies the session that performed a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterId(pub u64);

impl WriterId {
    /// A process-unique writer id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for WriterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

/// Published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotChanged {
    pub key: String,
    pub writer: WriterId,
}

/// Key-value store holding serialized snapshots.
pub trait SnapshotStore: Send + Sync + 'static {
    /// Reads the value stored under `key`, `None` if nothing was written yet.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value under `key` and notifies subscribers.
    fn save(&self, key: &str, snapshot: &str, writer: WriterId) -> Result<(), StoreError>;

    /// Receiver for change notifications of every key.
    fn subscribe(&self) -> broadcast::Receiver<SnapshotChanged>;
}

/// Loads the ledger stored under `key`.
///
/// A missing snapshot is an empty ledger. So is a snapshot that fails to decode;
/// that case is logged and the broken data is left in place until the next write
/// replaces it.
pub fn load_ledger(store: &dyn SnapshotStore, key: &str) -> Result<Ledger, StoreError> {
    let Some(snapshot) = store.load(key)? else {
        debug!(key, "No snapshot stored, starting empty");
        return Ok(Ledger::new());
    };
    match Ledger::decode(&snapshot) {
        Ok(ledger) => Ok(ledger),
        Err(e) => {
            warn!(key, error = %e, "Corrupt snapshot, treating as empty ledger");
            Ok(Ledger::new())
        }
    }
}

/// Writes the full ledger under `key` as one snapshot.
pub fn save_ledger(
    store: &dyn SnapshotStore,
    key: &str,
    ledger: &Ledger,
    writer: WriterId,
) -> Result<(), OrderError> {
    let snapshot = ledger.encode()?;
    store.save(key, &snapshot, writer)?;
    debug!(key, %writer, orders = ledger.len(), "Snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::order;
    use crate::model::OrderStatus;

    #[test]
    fn test_missing_snapshot_is_empty() {
        let store = MemoryStore::new();
        assert!(load_ledger(&store, DEFAULT_LEDGER_KEY).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_is_empty() {
        let store = MemoryStore::new();
        store
            .save(DEFAULT_LEDGER_KEY, "[{\"id\": 12", WriterId(1))
            .unwrap();
        assert!(load_ledger(&store, DEFAULT_LEDGER_KEY).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let ledger = Ledger::from_orders(vec![order(1, 100, OrderStatus::Placed, false)]);
        save_ledger(&store, DEFAULT_LEDGER_KEY, &ledger, WriterId(1)).unwrap();
        assert_eq!(load_ledger(&store, DEFAULT_LEDGER_KEY).unwrap(), ledger);
    }

    #[test]
    fn test_writer_ids_are_unique() {
        assert_ne!(WriterId::next(), WriterId::next());
    }
}
