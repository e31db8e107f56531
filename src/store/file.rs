use super::{SnapshotChanged, SnapshotStore, StoreError, WriterId, NOTIFY_CAPACITY};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::debug;

/// Snapshot store backed by one JSON file per key.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// reader sees either the old or the new snapshot, never a partial one.
/// Change notifications reach the subscribers of this instance only.
///
/// Reads and writes use blocking `std::fs` calls on the session's task. A
/// ledger snapshot is small, so a write costs one short file replace; a store
/// holding large snapshots should move this I/O off the runtime.
pub struct FileStore {
    dir: PathBuf,
    notify: broadcast::Sender<SnapshotChanged>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let (notify, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            dir: dir.into(),
            notify,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, snapshot: &str, writer: WriterId) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, snapshot)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = snapshot.len(), "Snapshot file replaced");

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

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.load("orders").unwrap(), None);
        store.save("orders", "[1,2]", WriterId(1)).unwrap();
        assert_eq!(store.load("orders").unwrap().as_deref(), Some("[1,2]"));

        store.save("orders", "[]", WriterId(1)).unwrap();
        assert_eq!(store.load("orders").unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("nested/orders.json.tmp").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.load(key), Err(StoreError::InvalidKey(_))));
        }
    }
}
