//! JSON emit functions for CLI output
//!
//! Every `--json` flag prints pretty serde JSON of the domain record on
//! stdout. Logs go to stderr, so stdout stays machine-readable.

use anyhow::{Context, Result};
use serde::Serialize;

use taskrun_utils::types::{DoctorOutput, Task, TaskExecution};

fn emit<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to emit {what} JSON"))
}

/// Emit one task
pub fn emit_task_json(task: &Task) -> Result<String> {
    emit(task, "task")
}

/// Emit a list of tasks (`list`, `search`)
pub fn emit_tasks_json(tasks: &[Task]) -> Result<String> {
    emit(tasks, "task list")
}

/// Emit one execution record
pub fn emit_execution_json(execution: &TaskExecution) -> Result<String> {
    emit(execution, "execution")
}

/// Emit an execution history, oldest first
pub fn emit_history_json(executions: &[TaskExecution]) -> Result<String> {
    emit(executions, "history")
}

/// Emit doctor results
pub fn emit_doctor_json(output: &DoctorOutput) -> Result<String> {
    emit(output, "doctor")
}
