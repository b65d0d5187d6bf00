//! Execution diagnostics
//!
//! The service reports every execution through an [`ExecutionLog`]. The
//! default implementation forwards to `tracing`; tests inject a recorder.

use taskrun_runner::ProcessOutput;
use taskrun_utils::error::TaskRunError;
use taskrun_utils::logging;
use taskrun_utils::types::{Task, TaskExecution};

/// Sink for per-execution diagnostics.
pub trait ExecutionLog {
    /// The task passed its checks and its command is about to be spawned.
    fn started(&self, task_id: &str, task: &Task, target: &str);

    /// The process exited and its record was built.
    fn completed(&self, task_id: &str, output: &ProcessOutput, execution: &TaskExecution);

    /// Spawning, reading or waiting failed. Nothing is recorded.
    fn failed(&self, task_id: &str, error: &TaskRunError);
}

impl<L: ExecutionLog + ?Sized> ExecutionLog for &L {
    fn started(&self, task_id: &str, task: &Task, target: &str) {
        (**self).started(task_id, task, target);
    }

    fn completed(&self, task_id: &str, output: &ProcessOutput, execution: &TaskExecution) {
        (**self).completed(task_id, output, execution);
    }

    fn failed(&self, task_id: &str, error: &TaskRunError) {
        (**self).failed(task_id, error);
    }
}

/// [`ExecutionLog`] backed by the structured logging helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExecutionLog;

impl ExecutionLog for TracingExecutionLog {
    fn started(&self, task_id: &str, task: &Task, target: &str) {
        logging::log_execution_start(task_id, &task.name, &task.command, target);
    }

    fn completed(&self, task_id: &str, output: &ProcessOutput, execution: &TaskExecution) {
        logging::log_execution_complete(
            task_id,
            output.exit_code,
            execution.duration_ms(),
            &execution.output,
        );
    }

    fn failed(&self, task_id: &str, error: &TaskRunError) {
        logging::log_execution_error(task_id, &format_chain(error));
    }
}

/// Error message followed by every `source()` below it.
fn format_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_format_chain_includes_io_source() {
        let err = TaskRunError::Io {
            context: "could not start shell 'sh'".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let chain = format_chain(&err);
        assert!(chain.contains("could not start shell 'sh'"));
        assert!(chain.ends_with("permission denied"));
    }

    #[test]
    fn test_format_chain_without_source() {
        let err = TaskRunError::Interrupted {
            context: "EINTR".to_string(),
        };
        assert_eq!(format_chain(&err), err.to_string());
    }
}
