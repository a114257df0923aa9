use super::errors::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// String key-value persistence, the same shape as the browser's localStorage
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Flat JSON object on disk. A mutation is only visible once the file
/// holding it has replaced the previous one.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?,
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        tracing::info!(
            "Opened storage at {} with {} key(s)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Json {
            path: self.path.display().to_string(),
            source,
        })?;

        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, serialized)).await?
    }
}

/// Writes a sibling file first and renames it over `path`, so the target
/// always holds either the old or the new content
fn replace_file(path: &Path, content: String) -> Result<(), StoreError> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, content)
        .and_then(|_| fs::rename(&staging, path))
        .map_err(|source| {
            let _ = fs::remove_file(&staging);
            StoreError::Io {
                path: path.display().to_string(),
                source,
            }
        })
}

#[async_trait]
impl Store for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;

        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.persist(&updated).await?;

        *entries = updated;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;

        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated).await?;

        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STREAM_LIST_KEY;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(STREAM_LIST_KEY).await.unwrap(), None);

        store.set(STREAM_LIST_KEY, "https://www.youtube.com/@a".into()).await.unwrap();
        assert_eq!(
            store.get(STREAM_LIST_KEY).await.unwrap().as_deref(),
            Some("https://www.youtube.com/@a")
        );

        store.remove(STREAM_LIST_KEY).await.unwrap();
        assert_eq!(store.get(STREAM_LIST_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(STREAM_LIST_KEY).await.unwrap(), None);
        store
            .set(STREAM_LIST_KEY, "https://www.youtube.com/@a\nhttps://www.youtube.com/@b".into())
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(STREAM_LIST_KEY).await.unwrap().as_deref(),
            Some("https://www.youtube.com/@a\nhttps://www.youtube.com/@b")
        );

        reopened.remove(STREAM_LIST_KEY).await.unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(STREAM_LIST_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = JsonFileStore::open(&path).unwrap();
        store
            .set(STREAM_LIST_KEY, "https://www.youtube.com/@a".into())
            .await
            .unwrap();

        dir.close().unwrap();

        assert!(matches!(
            store
                .set(STREAM_LIST_KEY, "https://www.youtube.com/@b".into())
                .await,
            Err(StoreError::Io { .. })
        ));
        assert!(store.remove(STREAM_LIST_KEY).await.is_err());
        assert_eq!(
            store.get(STREAM_LIST_KEY).await.unwrap().as_deref(),
            Some("https://www.youtube.com/@a")
        );
    }

    #[tokio::test]
    async fn writes_leave_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = JsonFileStore::open(&path).unwrap();
        store
            .set(STREAM_LIST_KEY, "https://www.youtube.com/@a".into())
            .await
            .unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn empty_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }
}
