//! Get, list and search command implementations

use anyhow::Result;

use taskrun_engine::{ExecutionLog, TaskService};
use taskrun_runner::ProcessRunner;
use taskrun_store::TaskStore;
use taskrun_utils::error::TaskRunError;
use taskrun_utils::types::Task;

use super::common::{format_task, format_task_line};
use super::json_emit::{emit_task_json, emit_tasks_json};

/// Execute the get command
pub fn execute_get_command<S, R, L>(service: &TaskService<S, R, L>, id: &str, json: bool) -> Result<Task>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let task = service.find_by_id(id)?;
    if json {
        println!("{}", emit_task_json(&task)?);
    } else {
        println!("{}", format_task(&task));
    }
    Ok(task)
}

/// Execute the list command. An empty store is not an error.
pub fn execute_list_command<S, R, L>(service: &TaskService<S, R, L>, json: bool) -> Result<Vec<Task>>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let tasks = service.find_all()?;
    if json {
        println!("{}", emit_tasks_json(&tasks)?);
    } else if tasks.is_empty() {
        println!("No tasks saved. Add one with 'taskrun put --name <name> --command <command>'.");
    } else {
        print_lines(&tasks);
    }
    Ok(tasks)
}

/// Execute the search command.
///
/// A search that matches nothing fails with `NotFound`, so scripts can
/// branch on the exit code.
pub fn execute_search_command<S, R, L>(
    service: &TaskService<S, R, L>,
    name: &str,
    json: bool,
) -> Result<Vec<Task>>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    let tasks = service.search_by_name(name)?;
    if tasks.is_empty() {
        return Err(TaskRunError::NotFound {
            id: format!("no tasks found matching '{name}'"),
        }
        .into());
    }
    if json {
        println!("{}", emit_tasks_json(&tasks)?);
    } else {
        print_lines(&tasks);
    }
    Ok(tasks)
}

fn print_lines(tasks: &[Task]) {
    for task in tasks {
        println!("{}", format_task_line(task));
    }
}
