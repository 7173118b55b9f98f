/* src/server/core/rust/src/store.rs */

//! Configuration store: a key-value collaborator holding JSON documents.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fixed key of the persisted visibility configuration.
pub const VISIBILITY_CONFIG_KEY: &str = "site.visibility";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("invalid store key \"{0}\"")]
  InvalidKey(String),
  #[error("failed to access \"{key}\": {source}")]
  Io {
    key: String,
    #[source]
    source: std::io::Error,
  },
  /// Stored bytes exist but are not JSON.
  #[error("stored value for \"{key}\" is not valid JSON: {source}")]
  Corrupt {
    key: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("failed to encode value for \"{key}\": {source}")]
  Encode {
    key: String,
    #[source]
    source: serde_json::Error,
  },
}

pub trait ConfigStore: Send + Sync {
  /// `Ok(None)` when nothing has been stored under `key`.
  fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>>;

  fn save<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>>;
}

/// In-process store, used for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryStore {
  entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_value(key: impl Into<String>, value: Value) -> Self {
    let mut entries = HashMap::new();
    entries.insert(key.into(), value);
    Self { entries: RwLock::new(entries) }
  }
}

impl ConfigStore for MemoryStore {
  fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
    Box::pin(async move { Ok(self.entries.read().await.get(key).cloned()) })
  }

  fn save<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
    Box::pin(async move {
      self.entries.write().await.insert(key.to_string(), value);
      Ok(())
    })
  }
}

/// One `<key>.json` document per key inside a directory.
pub struct FileStore {
  dir: PathBuf,
  // Held across write + rename: concurrent saves share the temp path.
  write_lock: Mutex<()>,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into(), write_lock: Mutex::new(()) }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
    let valid = !key.is_empty()
      && !key.starts_with('.')
      && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !valid {
      return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(self.dir.join(format!("{key}.json")))
  }
}

impl ConfigStore for FileStore {
  fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
    Box::pin(async move {
      let path = self.path_for(key)?;
      let content = match tokio::fs::read_to_string(&path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StoreError::Io { key: key.to_string(), source }),
      };
      serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Corrupt { key: key.to_string(), source })
    })
  }

  fn save<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, Result<(), StoreError>> {
    Box::pin(async move {
      let path = self.path_for(key)?;
      let json = serde_json::to_string_pretty(&value)
        .map_err(|source| StoreError::Encode { key: key.to_string(), source })?;
      let io_err = |source| StoreError::Io { key: key.to_string(), source };

      let _guard = self.write_lock.lock().await;
      tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
      // Write-then-rename so readers never observe a half-written document.
      let tmp = path.with_extension("json.tmp");
      tokio::fs::write(&tmp, json).await.map_err(io_err)?;
      tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;
      Ok(())
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[tokio::test]
  async fn memory_store_round_trip() {
    let store = MemoryStore::new();
    assert!(store.load("k").await.unwrap().is_none());
    store.save("k", json!({"a": 1})).await.unwrap();
    assert_eq!(store.load("k").await.unwrap(), Some(json!({"a": 1})));
  }

  #[tokio::test]
  async fn file_store_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    assert!(store.load(VISIBILITY_CONFIG_KEY).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn file_store_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested"));
    store.save(VISIBILITY_CONFIG_KEY, json!({"pages": {}})).await.unwrap();
    assert!(dir.path().join("nested/site.visibility.json").is_file());
    assert!(!dir.path().join("nested/site.visibility.json.tmp").exists());
    assert_eq!(store.load(VISIBILITY_CONFIG_KEY).await.unwrap(), Some(json!({"pages": {}})));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn file_store_concurrent_saves_stay_readable() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(FileStore::new(dir.path()));
    let mut tasks = Vec::new();
    for i in 0..16 {
      let store = store.clone();
      let filler = "x".repeat(4096 * (i % 4 + 1));
      tasks.push(tokio::spawn(async move {
        store.save(VISIBILITY_CONFIG_KEY, json!({"writer": i, "filler": filler})).await
      }));
    }
    for task in tasks {
      task.await.unwrap().unwrap();
    }
    let stored = store.load(VISIBILITY_CONFIG_KEY).await.unwrap().unwrap();
    assert!(stored["writer"].is_u64());
  }

  #[tokio::test]
  async fn file_store_corrupt_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("site.visibility.json"), "{not json").unwrap();
    let store = FileStore::new(dir.path());
    let err = store.load(VISIBILITY_CONFIG_KEY).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
  }

  #[tokio::test]
  async fn file_store_rejects_path_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    for key in ["../etc/passwd", "a/b", "", ".hidden"] {
      let err = store.load(key).await.unwrap_err();
      assert!(matches!(err, StoreError::InvalidKey(_)), "{key}");
    }
  }
}
