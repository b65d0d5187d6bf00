//! Task persistence
//!
//! The engine talks to storage only through [`TaskStore`]. Two
//! implementations ship with the crate:
//!
//! - [`InMemoryTaskStore`] for tests and embedding
//! - [`JsonFileTaskStore`] for the command line, one JSON document on disk

pub mod id;
pub mod json_file;
pub mod memory;

use std::sync::Arc;

use taskrun_utils::error::StoreError;
use taskrun_utils::types::Task;

pub use id::generate_task_id;
pub use json_file::JsonFileTaskStore;
pub use memory::InMemoryTaskStore;

/// Persistence operations the task service depends on.
///
/// Implementations must be safe to call from several threads at once. Each
/// individual call is atomic; sequences of calls are not.
pub trait TaskStore {
    /// Look a task up by id.
    fn find_by_id(&self, id: &str) -> Result<Option<Task>, StoreError>;

    /// Every stored task.
    fn find_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Tasks whose name contains `fragment`, ignoring case.
    fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Task>, StoreError>;

    /// Insert or replace a task keyed by id.
    ///
    /// A task without an id is assigned a fresh one. The stored task is
    /// returned.
    fn save(&self, task: Task) -> Result<Task, StoreError>;

    /// Remove a task and its history. Returns whether anything was removed.
    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
}

impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    fn find_by_id(&self, id: &str) -> Result<Option<Task>, StoreError> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        (**self).find_all()
    }

    fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Task>, StoreError> {
        (**self).find_by_name_containing(fragment)
    }

    fn save(&self, task: Task) -> Result<Task, StoreError> {
        (**self).save(task)
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        (**self).delete_by_id(id)
    }
}
