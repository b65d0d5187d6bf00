use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use taskrun_utils::error::StoreError;
use taskrun_utils::types::Task;

use crate::{TaskStore, generate_task_id};

/// Process-local task store.
///
/// Tasks live in a `BTreeMap` keyed by id, so listings come back in id
/// order. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<BTreeMap<String, Task>>,
}

impl InMemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing tasks, as if loaded from elsewhere.
    ///
    /// Tasks are taken as-is; ones without an id are assigned one.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut map = BTreeMap::new();
        for mut task in tasks {
            let id = task
                .id
                .get_or_insert_with(|| generate_task_id(&task.name))
                .clone();
            map.insert(id, task);
        }
        Self {
            tasks: RwLock::new(map),
        }
    }

    /// Number of stored tasks.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Task>>, StoreError> {
        self.tasks.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Task>>, StoreError> {
        self.tasks.write().map_err(|_| StoreError::Poisoned)
    }
}

impl TaskStore for InMemoryTaskStore {
    fn find_by_id(&self, id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|task| task.name_contains(fragment))
            .cloned()
            .collect())
    }

    fn save(&self, mut task: Task) -> Result<Task, StoreError> {
        let mut tasks = self.write()?;
        let id = match task.id.clone() {
            Some(id) => id,
            None => {
                let mut id = generate_task_id(&task.name);
                while tasks.contains_key(&id) {
                    id = generate_task_id(&task.name);
                }
                task.id = Some(id.clone());
                id
            }
        };
        tasks.insert(id, task.clone());
        Ok(task)
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.remove(id).is_some())
    }
}
