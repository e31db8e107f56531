use super::{SnapshotChanged, SnapshotStore, StoreError, WriterId, NOTIFY_CAPACITY};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;

/// In-memory snapshot store.
///
/// Wrap it in an `Arc` and hand it to several sessions to simulate browser tabs
/// sharing one local storage.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    notify: broadcast::Sender<SnapshotChanged>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            entries: Mutex::new(HashMap::new()),
            notify,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, snapshot: &str, writer: WriterId) -> Result<(), StoreError> {
        {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.insert(key.to_string(), snapshot.to_string());
        }
        // No subscribers is fine
        let _ = self.notify.send(SnapshotChanged {
            key: key.to_string(),
            writer,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SnapshotChanged> {
        self.notify.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_notifies_subscribers() {
        let store = MemoryStore::new();
        let mut events = store.subscribe();

        store.save("orders", "[]", WriterId(7)).unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.key, "orders");
        assert_eq!(event.writer, WriterId(7));
        assert_eq!(store.load("orders").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.load("other").unwrap(), None);
    }
}
