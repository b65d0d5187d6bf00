//! Put and update command implementations
//!
//! Handles `taskrun put` and `taskrun update`. Both go through the
//! command validator before anything is written.

use anyhow::Result;

use taskrun_engine::{ExecutionLog, TaskService};
use taskrun_runner::ProcessRunner;
use taskrun_store::TaskStore;
use taskrun_utils::types::{Task, TaskDraft};

use super::common::format_task;
use super::json_emit::emit_task_json;

/// Execute the put command
pub fn execute_put_command<S, R, L>(
    service: &TaskService<S, R, L>,
    draft: TaskDraft,
    json: bool,
) -> Result<Task>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let task = service.save(draft)?;
    print_saved(&task, json, "Saved")?;
    Ok(task)
}

/// Execute the update command
pub fn execute_update_command<S, R, L>(
    service: &TaskService<S, R, L>,
    id: &str,
    name: Option<String>,
    command: Option<String>,
    json: bool,
) -> Result<Task>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let task = service.update(id, name, command)?;
    print_saved(&task, json, "Updated")?;
    Ok(task)
}

fn print_saved(task: &Task, json: bool, verb: &str) -> Result<()> {
    if json {
        println!("{}", emit_task_json(task)?);
    } else {
        println!("✓ {verb} task {}", task.id.as_deref().unwrap_or("-"));
        println!("{}", format_task(task));
    }
    Ok(())
}
