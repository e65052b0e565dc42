//! Key-value storage backends
//!
//! The document store only needs a flat string-to-string map with
//! get/set/remove, the same surface a browser's local storage offers.
//!
//! - `MemoryStore`: in-process map with an optional byte quota
//! - `FileStore`: one file per key inside a data directory, written atomically

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A flat string key-value medium
pub trait KeyValueStore {
    /// Read a slot; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Write a slot, replacing any previous value
    ///
    /// On error the previous value must be left untouched.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;

    /// Remove a slot; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// In-memory backend
///
/// When a capacity is set, a write that would push the total of key and
/// value lengths past it fails with a "quota exceeded" error, mirroring
/// browser storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes beyond `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Bytes currently used (keys plus values)
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if let Some(capacity) = self.capacity {
            let current = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let projected = self.used_bytes() - current + key.len() + value.len();
            if projected > capacity {
                return Err(io::Error::other(format!(
                    "QuotaExceededError: storage quota exceeded ({} > {} bytes)",
                    projected, capacity
                )));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed backend
///
/// Each key maps to `<dir>/<key>.json` with `:` replaced by `_`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace(':', "_")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    let result = File::create(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "one").unwrap();
        store.set("a", "two").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("two"));

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_memory_quota_rejects_and_keeps_old_value() {
        let mut store = MemoryStore::with_capacity(10);
        store.set("k", "12345").unwrap();

        let err = store.set("k", "1234567890").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("12345"));

        // Replacing a value only counts the difference
        store.set("k", "123456789").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("data"));

        assert_eq!(store.get("rp:v1:doc").unwrap(), None);
        store.set("rp:v1:doc", "{}").unwrap();
        assert_eq!(store.get("rp:v1:doc").unwrap().as_deref(), Some("{}"));
        assert!(store.path_for("rp:v1:doc").ends_with("rp_v1_doc.json"));

        store.remove("rp:v1:doc").unwrap();
        store.remove("rp:v1:doc").unwrap();
        assert_eq!(store.get("rp:v1:doc").unwrap(), None);
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.json");

        atomic_write(&nested_path, b"test data").unwrap();

        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "test data");
        assert!(!nested_path.with_extension("tmp").exists());
    }
}
