//! Exec command implementation
//!
//! Handles `taskrun exec`: runs the stored command through the configured
//! shell and prints the recorded execution. A non-zero exit status of the
//! command itself still exits 0; only spawn, read and wait failures are
//! errors.

use anyhow::Result;

use taskrun_engine::{ExecutionLog, TaskService};
use taskrun_runner::ProcessRunner;
use taskrun_store::TaskStore;
use taskrun_utils::types::TaskExecution;

use super::json_emit::emit_execution_json;

/// Execute the exec command
pub fn execute_exec_command<S, R, L>(
    service: &TaskService<S, R, L>,
    id: &str,
    target: Option<&str>,
    json: bool,
) -> Result<TaskExecution>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let execution = service.execute(id, target)?;
    if json {
        println!("{}", emit_execution_json(&execution)?);
    } else if !execution.output.is_empty() {
        println!("{}", execution.output);
    }
    Ok(execution)
}
