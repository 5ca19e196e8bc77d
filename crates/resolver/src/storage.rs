//! Named record-set persistence.
//!
//! A set is an ordered list of JSON records addressed by name. Reads never
//! fail: a missing, empty or malformed set is an empty list. Writes report
//! every failure.
//!
//! [`SetStore::update_set`] is the only way to change a set in place. On
//! disk it holds an exclusive advisory lock on `<dir>/.<name>.lock` for the
//! whole load-edit-save, so separate processes sharing a data directory
//! never overwrite each other's appends.

use faqgate_core::{AppError, AppResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Read-only base entries shipped with the deployment.
pub const BASE_SET: &str = "faq";

/// Entries added by generation and admin curation.
pub const CURATED_SET: &str = "faq_custom";

/// Questions awaiting an admin answer.
pub const PENDING_SET: &str = "pending";

/// Storage backend for named record sets.
pub trait SetStore: Send + Sync {
    /// Load a set; anything unreadable loads as empty.
    fn load_set(&self, name: &str) -> Vec<Value>;

    /// Replace a set's contents durably.
    fn save_set(&self, name: &str, records: &[Value]) -> AppResult<()>;

    /// Load, edit and save a set as one exclusive step.
    ///
    /// `edit` returns whether it changed the records; nothing is written
    /// when it did not.
    fn update_set(&self, name: &str, edit: &mut dyn FnMut(&mut Vec<Value>) -> bool)
        -> AppResult<()>;
}

/// Stores each set as a pretty-printed JSON array in `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory and any missing
    /// set file as an empty array.
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("Failed to create data directory {:?}: {}", dir, e))
        })?;

        let store = Self { dir };
        for name in [BASE_SET, CURATED_SET, PENDING_SET] {
            let path = store.set_path(name);
            if !path.exists() {
                store.save_set(name, &[])?;
                tracing::debug!("Initialized empty set at {:?}", path);
            }
        }

        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a set.
    pub fn set_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn lock_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{}.lock", name))
    }

    fn open_lock_file(&self, name: &str) -> AppResult<File> {
        let path = self.lock_path(name);
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| AppError::Storage(format!("Failed to open lock file {:?}: {}", path, e)))
    }
}

impl SetStore for JsonFileStore {
    fn load_set(&self, name: &str) -> Vec<Value> {
        let path = self.set_path(name);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read set {:?}, treating as empty: {}", path, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Corrupted set {:?}, treating as empty: {}", path, e);
                Vec::new()
            }
        }
    }

    fn save_set(&self, name: &str, records: &[Value]) -> AppResult<()> {
        let path = self.set_path(name);
        let json = serde_json::to_string_pretty(records)?;

        // Each writer gets its own temp file; persisting renames it over the
        // set so readers never see a partial write
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| {
            AppError::Storage(format!("Failed to create temp file in {:?}: {}", self.dir, e))
        })?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| AppError::Storage(format!("Failed to write set '{}': {}", name, e)))?;
        tmp.persist(&path).map_err(|e| {
            AppError::Storage(format!("Failed to replace {:?}: {}", path, e.error))
        })?;

        tracing::debug!("Saved {} records to {:?}", records.len(), path);
        Ok(())
    }

    fn update_set(
        &self,
        name: &str,
        edit: &mut dyn FnMut(&mut Vec<Value>) -> bool,
    ) -> AppResult<()> {
        let mut lock = fd_lock::RwLock::new(self.open_lock_file(name)?);
        let _guard = lock.write().map_err(|e| {
            AppError::Storage(format!("Failed to lock set '{}': {}", name, e))
        })?;

        let mut records = self.load_set(name);
        if edit(&mut records) {
            self.save_set(name, &records)?;
        }
        Ok(())
    }
}

/// Keeps sets in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with initial sets.
    pub fn with_sets(sets: impl IntoIterator<Item = (String, Vec<Value>)>) -> Self {
        Self {
            sets: RwLock::new(sets.into_iter().collect()),
        }
    }
}

impl SetStore for MemoryStore {
    fn load_set(&self, name: &str) -> Vec<Value> {
        match self.sets.read() {
            Ok(sets) => sets.get(name).cloned().unwrap_or_default(),
            Err(_) => {
                tracing::warn!("Memory store lock poisoned, treating set '{}' as empty", name);
                Vec::new()
            }
        }
    }

    fn save_set(&self, name: &str, records: &[Value]) -> AppResult<()> {
        let mut sets = self
            .sets
            .write()
            .map_err(|_| AppError::Storage("Memory store lock poisoned".to_string()))?;
        sets.insert(name.to_string(), records.to_vec());
        Ok(())
    }

    fn update_set(
        &self,
        name: &str,
        edit: &mut dyn FnMut(&mut Vec<Value>) -> bool,
    ) -> AppResult<()> {
        let mut sets = self
            .sets
            .write()
            .map_err(|_| AppError::Storage("Memory store lock poisoned".to_string()))?;
        let records = sets.entry(name.to_string()).or_default();
        edit(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_open_initializes_missing_sets() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path().join("data")).unwrap();

        for name in [BASE_SET, CURATED_SET, PENDING_SET] {
            let content = fs::read_to_string(store.set_path(name)).unwrap();
            assert_eq!(content.trim(), "[]");
        }
    }

    #[test]
    fn test_open_keeps_existing_sets() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("faq.json"),
            r#"[{"question":"q","answer":"a"}]"#,
        )
        .unwrap();

        let store = JsonFileStore::open(temp.path()).unwrap();
        assert_eq!(store.load_set(BASE_SET).len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path()).unwrap();

        let records = vec![json!({"question": "Où est le menu ?", "answer": "En haut."})];
        store.save_set(CURATED_SET, &records).unwrap();

        assert_eq!(store.load_set(CURATED_SET), records);
        let raw = fs::read_to_string(store.set_path(CURATED_SET)).unwrap();
        assert!(raw.contains("Où est le menu ?"), "UTF-8 must be written unescaped");
    }

    #[test]
    fn test_corrupted_and_empty_files_load_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path()).unwrap();

        fs::write(store.set_path(PENDING_SET), "{ not json").unwrap();
        assert!(store.load_set(PENDING_SET).is_empty());

        fs::write(store.set_path(PENDING_SET), "   \n").unwrap();
        assert!(store.load_set(PENDING_SET).is_empty());

        fs::write(store.set_path(PENDING_SET), r#"{"question":"not an array"}"#).unwrap();
        assert!(store.load_set(PENDING_SET).is_empty());
    }

    #[test]
    fn test_missing_file_loads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path()).unwrap();
        assert!(store.load_set("does_not_exist").is_empty());
    }

    #[test]
    fn test_saves_leave_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path()).unwrap();

        store.save_set(CURATED_SET, &[json!({"question": "q"})]).unwrap();
        store
            .update_set(PENDING_SET, &mut |records: &mut Vec<Value>| {
                records.push(json!({"question": "p"}));
                true
            })
            .unwrap();

        let stray: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| !name.ends_with(".json") && !name.ends_with(".lock"))
            .collect();
        assert!(stray.is_empty(), "unexpected files: {:?}", stray);
    }

    #[test]
    fn test_unchanged_update_does_not_write() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp.path()).unwrap();
        fs::write(store.set_path(PENDING_SET), "{ not json").unwrap();

        store.update_set(PENDING_SET, &mut |_: &mut Vec<Value>| false).unwrap();

        let raw = fs::read_to_string(store.set_path(PENDING_SET)).unwrap();
        assert_eq!(raw, "{ not json");
    }

    #[test]
    fn test_updates_from_separate_stores_are_all_kept() {
        const WRITERS: usize = 4;
        const APPENDS: usize = 25;

        let temp = TempDir::new().unwrap();
        JsonFileStore::open(temp.path()).unwrap();

        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let dir = temp.path().to_path_buf();
                std::thread::spawn(move || {
                    // Own store per thread, as a separate CLI process would have
                    let store = JsonFileStore::open(dir).unwrap();
                    for i in 0..APPENDS {
                        store
                            .update_set(CURATED_SET, &mut |records: &mut Vec<Value>| {
                                records.push(json!({"writer": writer, "i": i}));
                                true
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = JsonFileStore::open(temp.path()).unwrap();
        assert_eq!(store.load_set(CURATED_SET).len(), WRITERS * APPENDS);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::with_sets([(BASE_SET.to_string(), vec![json!({"a": 1})])]);
        assert_eq!(store.load_set(BASE_SET).len(), 1);
        assert!(store.load_set(PENDING_SET).is_empty());

        store.save_set(PENDING_SET, &[json!({"b": 2})]).unwrap();
        assert_eq!(store.load_set(PENDING_SET), vec![json!({"b": 2})]);
    }
}
