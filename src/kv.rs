//! Local key-value persistence for story data and node positions.
//!
//! The store and the position cache persist through this trait rather than
//! touching storage directly, so the backing mechanism stays swappable.

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::instrument;

/// A persistent string-keyed store. Values are serialized JSON documents;
/// callers own the encoding.
pub trait KeyValueStore {
  fn get(&self, key: &str) -> Result<Option<String>, std::io::Error>;
  fn set(&mut self, key: &str, value: &str) -> Result<(), std::io::Error>;
  fn remove(&mut self, key: &str) -> Result<(), std::io::Error>;
}

/// In-memory store; state dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, std::io::Error> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), std::io::Error> {
    self.entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), std::io::Error> {
    self.entries.remove(key);
    Ok(())
  }
}

/// File-backed store: one JSON file per key under a base directory.
#[derive(Debug)]
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn key_path(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{key}.json"))
  }
}

impl KeyValueStore for FileStore {
  #[instrument(level = "trace", skip(self))]
  fn get(&self, key: &str) -> Result<Option<String>, std::io::Error> {
    match std::fs::read_to_string(self.key_path(key)) {
      Ok(s) => Ok(Some(s)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  #[instrument(level = "trace", skip(self, value))]
  fn set(&mut self, key: &str, value: &str) -> Result<(), std::io::Error> {
    let path = self.key_path(key);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, value)
  }

  #[instrument(level = "trace", skip(self))]
  fn remove(&mut self, key: &str) -> Result<(), std::io::Error> {
    match std::fs::remove_file(self.key_path(key)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e),
    }
  }
}
