//! Task services for taskrun
//!
//! [`TaskService`] is the library entry point: it validates and saves
//! tasks, looks them up, and runs their commands through a
//! [`ProcessRunner`](taskrun_runner::ProcessRunner), appending each run to
//! the task's history. [`doctor`] holds the environment health checks.
//!
//! ```rust
//! use taskrun_engine::TaskService;
//! use taskrun_store::InMemoryTaskStore;
//! use taskrun_utils::types::TaskDraft;
//!
//! let service = TaskService::new(InMemoryTaskStore::new());
//! let task = service.save(TaskDraft::new("list", "echo hello"))?;
//! assert_eq!(service.find_all()?.len(), 1);
//! # let _ = task;
//! # Ok::<(), taskrun_utils::error::TaskRunError>(())
//! ```

pub mod doctor;
pub mod execution_log;
pub mod service;

pub use doctor::DoctorCommand;
pub use execution_log::{ExecutionLog, TracingExecutionLog};
pub use service::TaskService;
