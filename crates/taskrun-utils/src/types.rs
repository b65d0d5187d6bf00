use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named shell command plus the history of its runs.
///
/// `Task` is the unit the store persists and the engine executes. The
/// `command` is an opaque shell command line; it is only ever checked by the
/// command validator when the task is saved through the service layer, which
/// then stamps `validated_at`.
///
/// # Invariants
///
/// - `executions` is append-only and in chronological order.
/// - A stored task always has an `id`; only unsaved tasks carry `None`.
/// - `validated_at` is `None` only for records that bypassed the save path
///   (for example a hand-edited store file). Such tasks are refused at
///   execution time.
///
/// # Example
///
/// ```rust
/// use taskrun_utils::types::Task;
///
/// let task = Task::new("list", "echo hello");
/// assert!(task.id.is_none());
/// assert!(task.executions.is_empty());
/// assert!(!task.is_validated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store identity. `None` until the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human readable name, searchable by substring.
    pub name: String,
    /// Shell command line, passed verbatim to the host shell.
    pub command: String,
    /// When the command last passed the safety check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
    /// Execution history, oldest first.
    #[serde(default)]
    pub executions: Vec<TaskExecution>,
}

impl Task {
    /// Create an unsaved, unvalidated task with an empty history.
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            command: command.into(),
            validated_at: None,
            executions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether the stored command went through the safety check.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Append one execution record to the end of the history.
    pub fn record_execution(&mut self, execution: TaskExecution) {
        self.executions.push(execution);
    }

    /// Most recent execution, if the task has ever run.
    #[must_use]
    pub fn latest_execution(&self) -> Option<&TaskExecution> {
        self.executions.last()
    }

    /// Case-insensitive substring match on the task name.
    #[must_use]
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(&fragment.to_lowercase())
    }
}

/// One completed run of a task's command.
///
/// Records are created by the engine only after the child process has been
/// waited for. `output` is every stdout line, then every stderr line, with
/// leading and trailing characters at or below U+0020 trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskExecution {
    /// Instant immediately before the process was spawned.
    pub start_time: DateTime<Utc>,
    /// Instant immediately after the process exited.
    pub end_time: DateTime<Utc>,
    /// Combined, trimmed output.
    pub output: String,
}

impl TaskExecution {
    #[must_use]
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, output: String) -> Self {
        Self {
            start_time,
            end_time,
            output,
        }
    }

    /// Wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}

/// Candidate task submitted for saving.
///
/// Drafts never carry executions; saving a draft over an existing id keeps
/// the stored history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Requested id. `None` lets the store assign one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub command: String,
}

impl TaskDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            command: command.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Doctor command output
///
/// Checks are sorted by name so repeated runs emit identical JSON apart
/// from `emitted_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorOutput {
    /// Schema version for this doctor format
    pub schema_version: String,
    /// RFC3339 UTC timestamp when the doctor output was emitted
    pub emitted_at: DateTime<Utc>,
    /// False when any check failed
    pub ok: bool,
    pub checks: Vec<DoctorCheck>,
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
}

/// Status of a health check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

/// Source of a configuration value.
///
/// Indicates where a configuration value originated from in the precedence chain:
/// CLI arguments > config file > programmatic overrides > built-in defaults.
///
/// # Serialization
///
/// Serializes to lowercase strings: `"cli"`, `"config"`, `"programmatic"`, `"default"`.
///
/// # Example
///
/// ```rust
/// use taskrun_utils::types::ConfigSource;
///
/// let source = ConfigSource::Cli;
/// let json = serde_json::to_string(&source).unwrap();
/// assert_eq!(json, r#""cli""#);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_record_execution_appends_in_order() {
        let mut task = Task::new("build", "make").with_id("task-1");
        task.record_execution(TaskExecution::new(at(0), at(1), "first".into()));
        task.record_execution(TaskExecution::new(at(2), at(3), "second".into()));

        assert_eq!(task.executions.len(), 2);
        assert_eq!(task.executions[0].output, "first");
        assert_eq!(task.latest_execution().unwrap().output, "second");
    }

    #[test]
    fn test_name_contains_ignores_case() {
        let task = Task::new("Nightly Backup", "echo ok");
        assert!(task.name_contains("backup"));
        assert!(task.name_contains("NIGHTLY"));
        assert!(task.name_contains(""));
        assert!(!task.name_contains("restore"));
    }

    #[test]
    fn test_execution_duration() {
        let exec = TaskExecution::new(at(10), at(12), String::new());
        assert_eq!(exec.duration_ms(), 2000);
    }

    #[test]
    fn test_task_json_shape() {
        let mut task = Task::new("list", "echo hello").with_id("task-abc");
        task.validated_at = Some(at(0));
        task.record_execution(TaskExecution::new(at(1), at(2), "hello".into()));

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "task-abc");
        assert_eq!(value["executions"][0]["output"], "hello");
        assert_eq!(value["executions"][0]["start_time"], "2023-11-14T22:13:21Z");
    }

    #[test]
    fn test_task_without_optional_fields_deserializes() {
        let task: Task =
            serde_json::from_str(r#"{"id":"t1","name":"n","command":"echo hi"}"#).unwrap();
        assert_eq!(task.id.as_deref(), Some("t1"));
        assert!(task.validated_at.is_none());
        assert!(task.executions.is_empty());
    }

    #[test]
    fn test_unsaved_task_omits_id() {
        let value = serde_json::to_value(Task::new("n", "c")).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("validated_at").is_none());
    }

    #[test]
    fn test_config_source_serialization() {
        for (source, expected) in [
            (ConfigSource::Cli, "cli"),
            (ConfigSource::Config, "config"),
            (ConfigSource::Programmatic, "programmatic"),
            (ConfigSource::Default, "default"),
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{expected}\""));
            assert_eq!(source.to_string(), expected);
        }
    }

    #[test]
    fn test_check_status_matches_json_form() {
        for status in [CheckStatus::Pass, CheckStatus::Warn, CheckStatus::Fail] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }
}
