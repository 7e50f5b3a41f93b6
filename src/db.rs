//! Local persistence for the task collection.
//!
//! The whole collection is stored as one JSON array under a single fixed key
//! of a synchronous key-value store. Loading and saving never fail towards
//! the caller: faults are logged and reported through `LoadStatus` /
//! `SaveStatus` so the application keeps running on an in-memory copy.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::task::Task;

/// Key under which the task collection is stored.
pub const STORAGE_KEY: &str = "efficient-tasks";

/// Faults raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A local, synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any prior value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_at(&self.dir))?;

        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(io_at(&tmp))?;
        f.write_all(value.as_bytes()).map_err(io_at(&tmp))?;
        f.flush().map_err(io_at(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_at(&path))?;
        Ok(())
    }
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

/// In-memory store with switchable faults; backs `--ephemeral` sessions and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Seed a raw value, bypassing the fault switches.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    #[cfg(test)]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("reads disabled".into()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Result of hydrating the collection at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// A stored collection was read; holds the number of tasks.
    Loaded(usize),
    /// Nothing stored under the key yet.
    Missing,
    /// Read or decode fault; an empty collection was substituted.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub tasks: Vec<Task>,
    pub status: LoadStatus,
}

/// Result of mirroring the collection to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Failed(String),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

/// Load the task collection, substituting an empty one on any fault.
pub fn load_tasks(store: &dyn KeyValueStore) -> LoadOutcome {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=tasks_load status=missing key={STORAGE_KEY}");
            return LoadOutcome {
                tasks: Vec::new(),
                status: LoadStatus::Missing,
            };
        }
        Err(e) => {
            warn!("event=tasks_load status=error key={STORAGE_KEY} error={e}");
            return LoadOutcome {
                tasks: Vec::new(),
                status: LoadStatus::Failed(e.to_string()),
            };
        }
    };

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(mut tasks) => {
            let mut seen = HashSet::new();
            tasks.retain(|t| {
                let first = seen.insert(t.id);
                if !first {
                    warn!("event=tasks_load status=duplicate_id id={} dropped=true", t.id);
                }
                first
            });
            debug!("event=tasks_load status=ok count={}", tasks.len());
            LoadOutcome {
                status: LoadStatus::Loaded(tasks.len()),
                tasks,
            }
        }
        Err(e) => {
            warn!("event=tasks_load status=corrupt key={STORAGE_KEY} error={e}");
            LoadOutcome {
                tasks: Vec::new(),
                status: LoadStatus::Failed(format!("corrupt stored value: {e}")),
            }
        }
    }
}

/// Serialise and store the whole collection under `STORAGE_KEY`.
pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) -> SaveStatus {
    let data = match serde_json::to_string_pretty(tasks) {
        Ok(data) => data,
        Err(e) => {
            warn!("event=tasks_save status=encode_error error={e}");
            return SaveStatus::Failed(e.to_string());
        }
    };
    match store.set(STORAGE_KEY, &data) {
        Ok(()) => {
            debug!("event=tasks_save status=ok count={}", tasks.len());
            SaveStatus::Saved
        }
        Err(e) => {
            warn!("event=tasks_save status=error key={STORAGE_KEY} error={e}");
            SaveStatus::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Category;
    use crate::task::NewTask;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn sample() -> Vec<Task> {
        let due = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        vec![
            NewTask::new("Buy milk", Category::Personal, due).into_task(Uuid::new_v4(), Utc::now()),
            NewTask::new("Ship release", Category::Work, due).into_task(Uuid::new_v4(), Utc::now()),
        ]
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        let outcome = load_tasks(&store);
        assert!(outcome.tasks.is_empty());
        assert_eq!(outcome.status, LoadStatus::Missing);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let tasks = sample();
        assert_eq!(save_tasks(&mut store, &tasks), SaveStatus::Saved);

        let outcome = load_tasks(&store);
        assert_eq!(outcome.status, LoadStatus::Loaded(2));
        assert_eq!(outcome.tasks, tasks);
    }

    #[test]
    fn test_duplicate_ids_keep_first_record() {
        let mut tasks = sample();
        let mut copy = tasks[0].clone();
        copy.description = "Buy oat milk".to_string();
        tasks.push(copy);
        let mut store = MemoryStore::new();
        save_tasks(&mut store, &tasks);

        let outcome = load_tasks(&store);
        assert_eq!(outcome.status, LoadStatus::Loaded(2));
        assert_eq!(outcome.tasks, tasks[..2].to_vec());
    }

    #[test]
    fn test_corrupt_value_falls_back_to_empty() {
        let store = MemoryStore::new().with_value(STORAGE_KEY, "{\"not\": \"an array\"}");
        let outcome = load_tasks(&store);
        assert!(outcome.tasks.is_empty());
        assert!(matches!(outcome.status, LoadStatus::Failed(_)));
    }

    #[test]
    fn test_read_fault_falls_back_to_empty() {
        let mut store = MemoryStore::new().with_value(STORAGE_KEY, "[]");
        store.fail_reads = true;
        let outcome = load_tasks(&store);
        assert!(outcome.tasks.is_empty());
        assert!(matches!(outcome.status, LoadStatus::Failed(_)));
    }

    #[test]
    fn test_write_fault_is_reported_not_raised() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let status = save_tasks(&mut store, &sample());
        assert!(!status.is_saved());
        assert_eq!(store.raw(STORAGE_KEY), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);

        let tasks = sample();
        assert!(save_tasks(&mut store, &tasks).is_saved());
        assert!(dir.path().join("nested").join("efficient-tasks.json").exists());
        assert!(!dir.path().join("nested").join("efficient-tasks.json.tmp").exists());

        assert_eq!(load_tasks(&store).tasks, tasks);
    }

    #[test]
    fn test_file_store_replaces_prior_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let store = FileStore::new("/tmp");
        assert!(matches!(store.path_for("../escape"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.path_for(""), Err(StorageError::InvalidKey(_))));
    }
}
