//! taskrun - store named shell commands and run them on demand
//!
//! A task is a human name plus a shell command. Commands are checked against
//! a blocklist of destructive patterns when they are saved; saved tasks can
//! then be executed through the host shell, and every run is appended to the
//! task's history with its start time, end time and captured output.
//!
//! taskrun can be used in two ways:
//! - **CLI**: the `taskrun` binary
//! - **Library**: embed [`TaskService`] over any [`TaskStore`]
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! taskrun put --name list --command "ls -la"
//! taskrun exec <id>
//! taskrun history <id> --json
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use taskrun::{InMemoryTaskStore, TaskDraft, TaskService};
//!
//! let service = TaskService::new(InMemoryTaskStore::new());
//! let task = service.save(TaskDraft::new("list", "echo hello")).unwrap();
//! assert!(task.id.is_some());
//! ```
//!
//! # Stable Public API
//!
//! - [`TaskService`] - save, update, lookup and execution surfaces
//! - [`TaskStore`] with [`InMemoryTaskStore`] and [`JsonFileTaskStore`]
//! - [`Config`], [`ConfigBuilder`] and [`CliArgs`] - configuration management
//! - [`TaskRunError`] and [`ExitCode`] - error taxonomy and CLI exit codes
//!
//! The member crates stay reachable under their own names for everything else.

pub use taskrun_config::{CliArgs, Config, ConfigBuilder, ConfigSource};
pub use taskrun_engine::{DoctorCommand, ExecutionLog, TaskService, TracingExecutionLog};
pub use taskrun_runner::{NativeRunner, ProcessOutput, ProcessRunner, Shell, ShellMode};
pub use taskrun_store::{InMemoryTaskStore, JsonFileTaskStore, TaskStore};
pub use taskrun_utils::error::{ConfigError, StoreError, TaskRunError, UserFriendlyError};
pub use taskrun_utils::exit_codes::ExitCode;
pub use taskrun_utils::types::{Task, TaskDraft, TaskExecution};
pub use taskrun_validation::{CommandValidator, UnsafeCommand};

pub mod cli;
