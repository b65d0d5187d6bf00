//! Shared helpers for CLI command implementations
//!
//! Human-readable rendering of tasks and execution records. JSON output
//! lives in `json_emit`.

use taskrun_utils::types::{Task, TaskExecution};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f UTC";

/// Multi-line summary of a single task
pub fn format_task(task: &Task) -> String {
    let validated = task
        .validated_at
        .map_or_else(|| "never".to_string(), |at| at.format(TIME_FORMAT).to_string());
    let last_run = task.latest_execution().map_or_else(
        || "never".to_string(),
        |run| run.start_time.format(TIME_FORMAT).to_string(),
    );

    format!(
        "Task {id}\n  name:      {name}\n  command:   {command}\n  validated: {validated}\n  runs:      {runs}\n  last run:  {last_run}",
        id = display_id(task),
        name = task.name,
        command = task.command,
        runs = task.executions.len(),
    )
}

/// One line per task for `list` and `search`
pub fn format_task_line(task: &Task) -> String {
    format!("{}\t{}\t{}", display_id(task), task.name, task.command)
}

/// Execution record with its output indented below the header
pub fn format_execution(execution: &TaskExecution) -> String {
    let mut out = format!(
        "{} -> {} ({} ms)",
        execution.start_time.format(TIME_FORMAT),
        execution.end_time.format(TIME_FORMAT),
        execution.duration_ms()
    );
    if execution.output.is_empty() {
        out.push_str("\n  (no output)");
    } else {
        for line in execution.output.lines() {
            out.push_str("\n  ");
            out.push_str(line);
        }
    }
    out
}

fn display_id(task: &Task) -> &str {
    task.id.as_deref().unwrap_or("-")
}
