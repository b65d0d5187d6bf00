//! Single-document JSON task store
//!
//! All tasks live in one file:
//!
//! ```json
//! { "version": 1, "tasks": [ { "id": "task-…", "name": "…", … } ] }
//! ```
//!
//! Reads parse the whole document; a missing file is an empty store. Writes
//! take an exclusive advisory lock on `<path>.lock`, re-read the document,
//! apply the change and replace the file atomically. The lock coordinates
//! taskrun processes only; it is not a security boundary.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use taskrun_utils::atomic_write::write_file_atomic;
use taskrun_utils::error::StoreError;
use taskrun_utils::types::Task;

use crate::{TaskStore, generate_task_id};

/// Current on-disk format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            tasks: Vec::new(),
        }
    }
}

impl StoreDocument {
    fn position(&self, id: &str) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.id.as_deref() == Some(id))
    }

    fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

/// Task store backed by a single JSON file.
///
/// Tasks are listed in insertion order. Replacing a task keeps its position.
#[derive(Debug, Clone)]
pub struct JsonFileTaskStore {
    path: Utf8PathBuf,
    lock_path: Utf8PathBuf,
}

impl JsonFileTaskStore {
    /// Point a store at `path`. Nothing is touched until the first call.
    #[must_use]
    pub fn open(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let lock_path = Utf8PathBuf::from(format!("{path}.lock"));
        Self { path, lock_path }
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the backing file exists yet.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.to_string(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        let document: StoreDocument =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                path: self.path.to_string(),
                reason: e.to_string(),
            })?;

        if document.version != STORE_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.to_string(),
                version: document.version,
            });
        }

        Ok(document)
    }

    fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let mut bytes = serde_json::to_vec_pretty(document).map_err(|e| StoreError::WriteFailed {
            path: self.path.to_string(),
            reason: e.to_string(),
        })?;
        bytes.push(b'\n');

        write_file_atomic(&self.path, &bytes).map_err(|e| StoreError::WriteFailed {
            path: self.path.to_string(),
            reason: format!("{e:#}"),
        })?;

        debug!(path = %self.path, tasks = document.tasks.len(), "Task store written");
        Ok(())
    }

    /// Run `apply` against a freshly loaded document while holding the
    /// exclusive lock. The document is written back only when `apply`
    /// reports a change.
    fn update<T>(
        &self,
        apply: impl FnOnce(&mut StoreDocument) -> (T, bool),
    ) -> Result<T, StoreError> {
        if let Some(parent) = self.lock_path.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_string(),
                source,
            })?;
        }

        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| StoreError::LockFailed {
                path: self.lock_path.to_string(),
                reason: e.to_string(),
            })?;

        let mut lock = RwLock::new(lock_file);
        let _guard = lock.write().map_err(|e| StoreError::LockFailed {
            path: self.lock_path.to_string(),
            reason: e.to_string(),
        })?;

        let mut document = self.load()?;
        let (result, changed) = apply(&mut document);
        if changed {
            self.persist(&document)?;
        }
        Ok(result)
    }
}

impl TaskStore for JsonFileTaskStore {
    fn find_by_id(&self, id: &str) -> Result<Option<Task>, StoreError> {
        let document = self.load()?;
        Ok(document
            .position(id)
            .map(|index| document.tasks[index].clone()))
    }

    fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.load()?.tasks)
    }

    fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .load()?
            .tasks
            .into_iter()
            .filter(|task| task.name_contains(fragment))
            .collect())
    }

    fn save(&self, mut task: Task) -> Result<Task, StoreError> {
        self.update(move |document| {
            let id = match task.id.clone() {
                Some(id) => id,
                None => {
                    let mut id = generate_task_id(&task.name);
                    while document.contains(&id) {
                        id = generate_task_id(&task.name);
                    }
                    task.id = Some(id.clone());
                    id
                }
            };

            match document.position(&id) {
                Some(index) => document.tasks[index] = task.clone(),
                None => document.tasks.push(task.clone()),
            }
            (task, true)
        })
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.update(|document| match document.position(id) {
            Some(index) => {
                document.tasks.remove(index);
                (true, true)
            }
            None => (false, false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::thread;
    use taskrun_utils::types::TaskExecution;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileTaskStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(".taskrun").join("tasks.json"))
            .unwrap();
        JsonFileTaskStore::open(path)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.exists());
        assert!(store.find_all().unwrap().is_empty());
        assert_eq!(store.find_by_id("nope").unwrap(), None);
    }

    #[test]
    fn test_save_creates_versioned_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let saved = store.save(Task::new("list", "echo hello")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["tasks"][0]["id"], saved.id.unwrap().as_str());
        assert_eq!(value["tasks"][0]["command"], "echo hello");
    }

    #[test]
    fn test_round_trip_through_reopen() {
        let dir = TempDir::new().unwrap();
        let started = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut task = Task::new("list", "echo hello").with_id("t1");
        task.validated_at = Some(started);
        task.record_execution(TaskExecution::new(started, started, "hello".into()));

        store_in(&dir).save(task.clone()).unwrap();

        let reopened = store_in(&dir);
        assert_eq!(reopened.find_by_id("t1").unwrap(), Some(task));
    }

    #[test]
    fn test_replace_keeps_position() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(Task::new("first", "echo 1").with_id("a")).unwrap();
        store.save(Task::new("second", "echo 2").with_id("b")).unwrap();
        store.save(Task::new("first v2", "echo 3").with_id("a")).unwrap();

        let names: Vec<_> = store.find_all().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["first v2", "second"]);
    }

    #[test]
    fn test_search_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(Task::new("Nightly Backup", "echo 1").with_id("a")).unwrap();
        store.save(Task::new("deploy", "echo 2").with_id("b")).unwrap();

        assert_eq!(store.find_by_name_containing("backup").unwrap().len(), 1);

        assert!(store.delete_by_id("a").unwrap());
        assert!(!store.delete_by_id("a").unwrap());
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_of_missing_id_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.delete_by_id("ghost").unwrap());
        assert!(!store.exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        match store.find_all() {
            Err(StoreError::Corrupt { path, .. }) => assert!(path.ends_with("tasks.json")),
            other => panic!("expected Corrupt, got {other:?}"),
        }
        assert!(store.save(Task::new("x", "echo x")).is_err());
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"version": 2, "tasks": []}"#).unwrap();

        assert!(matches!(
            store.find_all(),
            Err(StoreError::UnsupportedVersion { version: 2, .. })
        ));
    }

    #[test]
    fn test_hand_written_task_without_stamp_loads() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{"version":1,"tasks":[{"id":"manual","name":"m","command":"echo m"}]}"#,
        )
        .unwrap();

        let task = store.find_by_id("manual").unwrap().unwrap();
        assert!(!task.is_validated());
        assert!(task.executions.is_empty());
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_tasks() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..10 {
                        store
                            .save(Task::new(format!("t{i}-{j}"), "echo ok"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.find_all().unwrap().len(), 40);
    }
}
