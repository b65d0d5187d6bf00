use std::fmt;
use std::io;
use thiserror::Error;

pub use crate::task_id::TaskIdError;
pub use taskrun_runner::RunnerError;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `TaskRunError` is the primary error type returned by the task service.
/// It provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Exit Code Mapping
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map errors to CLI exit codes:
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors |
/// | 3 | Validation (unsafe command, malformed id) |
/// | 4 | Task not found |
/// | 5 | Task rejected (never validated) |
/// | 6 | Store errors |
/// | 70 | Spawn, read or wait failures |
///
/// # Example
///
/// ```rust
/// use taskrun_utils::error::TaskRunError;
/// use taskrun_utils::exit_codes::ExitCode;
///
/// let err = TaskRunError::NotFound { id: "task-1".to_string() };
/// assert_eq!(err.to_exit_code(), ExitCode::NOT_FOUND);
/// assert!(err.display_for_user().contains("Suggestions:"));
/// ```
///
/// Library code returns `TaskRunError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum TaskRunError {
    #[error("Unsafe command detected: {reason}")]
    Validation { reason: String },

    #[error("Task not found: {id}")]
    NotFound { id: String },

    #[error("Task {id} cannot be executed: {reason}")]
    Rejected { id: String, reason: String },

    #[error("Execution failed: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Execution interrupted: {context}")]
    Interrupted { context: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<RunnerError> for TaskRunError {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::SpawnFailed { program, source } => Self::Io {
                context: format!("could not start shell '{program}'"),
                source,
            },
            RunnerError::StreamReadFailed { stream, source } => Self::Io {
                context: format!("could not read {stream}"),
                source,
            },
            RunnerError::WaitFailed { source } => Self::Io {
                context: "could not wait for the command".to_string(),
                source,
            },
            RunnerError::WaitInterrupted { reason } => Self::Interrupted { context: reason },
            RunnerError::ShellNotFound { shell } => Self::Io {
                context: format!("shell '{shell}' not found on PATH"),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        }
    }
}

impl From<TaskIdError> for TaskRunError {
    fn from(err: TaskIdError) -> Self {
        Self::Validation {
            reason: err.to_string(),
        }
    }
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Lookup,
    Execution,
    Persistence,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Validation => write!(f, "Validation"),
            Self::Lookup => write!(f, "Lookup"),
            Self::Execution => write!(f, "Execution"),
            Self::Persistence => write!(f, "Persistence"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },

    #[error("Configuration validation failed: {error_count} errors")]
    ValidationFailed {
        errors: Vec<String>,
        error_count: usize,
    },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
            Self::ValidationFailed { errors, .. } => {
                format!(
                    "Configuration validation failed with {} errors: {}",
                    errors.len(),
                    errors.join(", ")
                )
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [defaults], [store] and [runner] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } => Some(
                "taskrun searches for .taskrun/config.toml starting from the current directory upward."
                    .to_string(),
            ),
            Self::DiscoveryFailed { .. } => Some(
                "Configuration discovery searches the directory tree for .taskrun/config.toml files."
                    .to_string(),
            ),
            Self::ValidationFailed { .. } => Some(
                "Configuration validation checks every value before any task is touched."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Remove unknown keys; only [defaults], [store] and [runner] are read".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "platform" | "runner.platform" => vec![
                    "Use 'auto', 'posix' or 'windows' as the platform".to_string(),
                    "Remove the option to detect the platform automatically".to_string(),
                ],
                "log_format" | "defaults.log_format" => {
                    vec!["Use 'compact' or 'json' as the log format".to_string()]
                }
                "shell" | "runner.shell" | "shell_flag" | "runner.shell_flag" => vec![
                    "Set both shell and shell_flag, e.g. shell = \"bash\" and shell_flag = \"-c\""
                        .to_string(),
                    "Remove both options to use the platform default shell".to_string(),
                ],
                "store_path" | "store.path" => vec![
                    "Provide a non-empty file path such as .taskrun/tasks.json".to_string(),
                ],
                _ => vec![
                    "Check the documentation for valid values for this option".to_string(),
                    "Remove the option to use the default value".to_string(),
                ],
            },
            Self::NotFound { .. } => vec![
                "Create .taskrun/config.toml in your project root".to_string(),
                "Use CLI flags instead of a configuration file".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check file permissions in the current directory and parent directories"
                    .to_string(),
                "Use --config <path> to specify configuration file explicitly".to_string(),
            ],
            Self::ValidationFailed { .. } => vec![
                "Review the configuration file values listed above".to_string(),
                "Run 'taskrun doctor' to see the effective configuration".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Task store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access task store at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Task store at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Task store at {path} has unsupported version {version}")]
    UnsupportedVersion { path: String, version: u32 },

    #[error("Failed to lock task store at {path}: {reason}")]
    LockFailed { path: String, reason: String },

    #[error("Failed to write task store at {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Task store lock poisoned")]
    Poisoned,

    #[error("Invalid task id: {0}")]
    InvalidId(#[from] TaskIdError),
}

impl UserFriendlyError for StoreError {
    fn user_message(&self) -> String {
        match self {
            Self::Io { path, source } => format!("Could not access task store {path}: {source}"),
            Self::Corrupt { path, reason } => {
                format!("Task store {path} could not be parsed: {reason}")
            }
            Self::UnsupportedVersion { path, version } => {
                format!("Task store {path} uses format version {version}, which is not supported")
            }
            Self::LockFailed { path, reason } => {
                format!("Could not lock task store {path}: {reason}")
            }
            Self::WriteFailed { path, reason } => {
                format!("Could not write task store {path}: {reason}")
            }
            Self::Poisoned => "The in-memory task store is unusable after a panic".to_string(),
            Self::InvalidId(err) => format!("Invalid task id: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Corrupt { .. } | Self::UnsupportedVersion { .. } => Some(
                "The task store is a single JSON document of the form {\"version\": 1, \"tasks\": [...]}."
                    .to_string(),
            ),
            Self::LockFailed { .. } => Some(
                "Writes take an exclusive lock on a .lock file next to the store.".to_string(),
            ),
            Self::Io { .. } | Self::WriteFailed { .. } => {
                Some("Writes go to a temporary file that is then renamed over the store.".to_string())
            }
            Self::Poisoned | Self::InvalidId(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Io { .. } | Self::WriteFailed { .. } => vec![
                "Check that the store directory exists and is writable".to_string(),
                "Use --store <path> to point at a different store file".to_string(),
            ],
            Self::Corrupt { path, .. } => vec![
                format!("Inspect {path} for hand edits or truncation"),
                "Restore the file from a backup or move it aside to start empty".to_string(),
            ],
            Self::UnsupportedVersion { .. } => {
                vec!["Upgrade taskrun to a version that understands this store".to_string()]
            }
            Self::LockFailed { .. } => vec![
                "Check whether another taskrun process is writing to the same store".to_string(),
            ],
            Self::Poisoned => vec!["Restart the process".to_string()],
            Self::InvalidId(_) => vec![
                "Use only letters, digits, '.', '_' and '-' in task ids".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidId(_) => ErrorCategory::Validation,
            _ => ErrorCategory::Persistence,
        }
    }
}

impl UserFriendlyError for RunnerError {
    fn user_message(&self) -> String {
        match self {
            Self::SpawnFailed { program, source } => {
                format!("Could not start shell '{program}': {source}")
            }
            Self::StreamReadFailed { stream, source } => {
                format!("Could not read the command's {stream}: {source}")
            }
            Self::WaitFailed { source } => format!("Could not wait for the command: {source}"),
            Self::WaitInterrupted { reason } => {
                format!("Waiting for the command was interrupted: {reason}")
            }
            Self::ShellNotFound { shell } => format!("Shell '{shell}' was not found on PATH"),
        }
    }

    fn context(&self) -> Option<String> {
        Some(
            "Task commands run through the host shell: 'sh -c' on POSIX, 'cmd.exe /C' on Windows."
                .to_string(),
        )
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SpawnFailed { .. } | Self::ShellNotFound { .. } => vec![
                "Check that the shell is installed and on PATH".to_string(),
                "Override the shell with --shell/--shell-flag or [runner] in config".to_string(),
                "Run 'taskrun doctor' to check the environment".to_string(),
            ],
            Self::StreamReadFailed { .. } | Self::WaitFailed { .. } => {
                vec!["Retry the execution; nothing was recorded".to_string()]
            }
            Self::WaitInterrupted { .. } => vec![
                "The command was interrupted before it finished; nothing was recorded".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Execution
    }
}

impl UserFriendlyError for TaskRunError {
    fn user_message(&self) -> String {
        match self {
            Self::Validation { reason } => format!("Task rejected: {reason}"),
            Self::NotFound { id } => format!("No task found: {id}"),
            Self::Rejected { id, reason } => format!("Task {id} cannot be executed: {reason}"),
            Self::Io { context, source } => format!("Execution failed: {context}: {source}"),
            Self::Interrupted { context } => format!("Execution interrupted: {context}"),
            Self::Store(err) => err.user_message(),
            Self::Config(err) => err.user_message(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Validation { .. } => Some(
                "Commands are checked against a blocklist of destructive programs and shell operators before they are saved."
                    .to_string(),
            ),
            Self::NotFound { .. } => None,
            Self::Rejected { .. } => Some(
                "Only tasks saved through taskrun carry a validation stamp; hand-edited store entries are refused."
                    .to_string(),
            ),
            Self::Io { .. } | Self::Interrupted { .. } => {
                Some("No execution record was stored for this run.".to_string())
            }
            Self::Store(err) => err.context(),
            Self::Config(err) => err.context(),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation { .. } => vec![
                "Remove redirections, pipes, '&' and ';' from the command".to_string(),
                "Split compound commands into separate tasks".to_string(),
            ],
            Self::NotFound { .. } => vec![
                "List known tasks with 'taskrun list'".to_string(),
                "Search by name with 'taskrun search <name>'".to_string(),
            ],
            Self::Rejected { id, .. } => vec![format!(
                "Re-save the task with 'taskrun update {id} --command <command>'"
            )],
            Self::Io { .. } => vec![
                "Check that the configured shell is installed and on PATH".to_string(),
                "Run 'taskrun doctor' to check the environment".to_string(),
            ],
            Self::Interrupted { .. } => vec!["Run the task again".to_string()],
            Self::Store(err) => err.suggestions(),
            Self::Config(err) => err.suggestions(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::Rejected { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::Io { .. } | Self::Interrupted { .. } => ErrorCategory::Execution,
            Self::Store(err) => err.category(),
            Self::Config(err) => err.category(),
        }
    }
}

impl TaskRunError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// The format is:
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    ///   • <suggestion 2>
    /// ```
    #[must_use]
    pub fn display_for_user(&self) -> String {
        render_report(self)
    }

    /// Map this error to the appropriate CLI exit code.
    ///
    /// This is the single source of truth for CLI exit codes; see
    /// [`crate::exit_codes`] for the table.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            TaskRunError::Validation { .. } => ExitCode::VALIDATION_FAILED,
            TaskRunError::NotFound { .. } => ExitCode::NOT_FOUND,
            TaskRunError::Rejected { .. } => ExitCode::REJECTED,
            TaskRunError::Io { .. } | TaskRunError::Interrupted { .. } => {
                ExitCode::EXECUTION_FAILURE
            }
            TaskRunError::Store(StoreError::InvalidId(_)) => ExitCode::VALIDATION_FAILED,
            TaskRunError::Store(_) => ExitCode::STORE_FAILURE,
            TaskRunError::Config(_) => ExitCode::CLI_ARGS,
        }
    }

    /// Whether this error is an expected outcome of user input rather than a
    /// fault worth logging at error level.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::NotFound { .. } | Self::Rejected { .. }
        )
    }
}

/// Render any [`UserFriendlyError`] in the standard report layout.
pub fn render_report(err: &dyn UserFriendlyError) -> String {
    let mut output = String::new();

    output.push_str(&format!("Error: {}\n", err.user_message()));

    if let Some(ctx) = err.context() {
        output.push_str(&format!("\nContext: {ctx}\n"));
    }

    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        output.push_str("\nSuggestions:\n");
        for suggestion in suggestions {
            output.push_str(&format!("  • {suggestion}\n"));
        }
    }

    output
}
