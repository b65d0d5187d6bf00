//! Delete command implementation

use anyhow::Result;

use taskrun_engine::{ExecutionLog, TaskService};
use taskrun_runner::ProcessRunner;
use taskrun_store::TaskStore;

/// Execute the delete command
pub fn execute_delete_command<S, R, L>(service: &TaskService<S, R, L>, id: &str) -> Result<()>
where
    S: TaskStore,
    R: ProcessRunner,
    L: ExecutionLog,
{
    service.delete(id)?;
    println!("✓ Deleted task {id}");
    Ok(())
}
