//! Shared foundations for taskrun: domain types, the error taxonomy, exit
//! codes, logging setup and small file-system helpers.

pub mod atomic_write;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod task_id;
pub mod types;

pub use error::{
    ConfigError, ErrorCategory, RunnerError, StoreError, TaskIdError, TaskRunError,
    UserFriendlyError,
};
pub use exit_codes::ExitCode;
pub use types::{
    CheckStatus, ConfigSource, DoctorCheck, DoctorOutput, Task, TaskDraft, TaskExecution,
};
