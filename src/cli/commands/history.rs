//! History command implementation

use anyhow::Result;

use taskrun_engine::{ExecutionLog, TaskService};
use taskrun_runner::ProcessRunner;
use taskrun_store::TaskStore;
use taskrun_utils::types::TaskExecution;

use super::common::format_execution;
use super::json_emit::emit_history_json;

/// Execute the history command
pub fn execute_history_command<S, R, L>(
    service: &TaskService<S, R, L>,
    id: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<Vec<TaskExecution>>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let executions = service.history(id, limit)?;
    if json {
        println!("{}", emit_history_json(&executions)?);
    } else if executions.is_empty() {
        println!("Task {id} has not been executed yet.");
    } else {
        for (i, execution) in executions.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", format_execution(execution));
        }
    }
    Ok(executions)
}
