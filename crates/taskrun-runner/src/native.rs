use crate::error::RunnerError;
use chrono::{TimeDelta, Utc};
use std::io::{self, Read};
use std::process::Stdio;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::debug;

use super::{CommandSpec, ProcessOutput, ProcessRunner};

// ============================================================================
// NativeRunner - Local Process Execution
// ============================================================================

/// Native process runner using `std::process::Command`.
///
/// Spawns the child with stdin closed and both output streams piped, drains
/// the two pipes on dedicated reader threads, and blocks until the child
/// exits. The pipe handles are owned by the reader threads and closed when
/// they finish, on success and failure alike.
///
/// There is no timeout: a child that never exits blocks the caller forever.
///
/// # Example
///
/// ```rust,no_run
/// use taskrun_runner::{NativeRunner, ProcessRunner, Shell};
///
/// let runner = NativeRunner::new();
/// let output = runner.run(&Shell::default().script("echo hello")).unwrap();
/// assert_eq!(output.merged_output(), "hello");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let clock = Instant::now();
        let started_at = Utc::now();
        let mut child = command.spawn().map_err(|source| RunnerError::SpawnFailed {
            program: cmd.program_name(),
            source,
        })?;
        debug!(pid = child.id(), program = %cmd.program_name(), "Spawned child process");

        // Drained concurrently so a full stderr pipe cannot stall the child while
        // we are still reading stdout.
        let stdout_reader = spawn_reader(child.stdout.take(), "stdout");
        let stderr_reader = spawn_reader(child.stderr.take(), "stderr");

        let status = match child.wait() {
            Ok(status) => status,
            Err(source) => {
                // Nothing is recorded for this run; make sure the readers see EOF.
                let _ = child.kill();
                let _ = stdout_reader.join();
                let _ = stderr_reader.join();
                return Err(classify_wait_error(source));
            }
        };
        // Derived from the monotonic clock so it never precedes started_at.
        let elapsed = TimeDelta::from_std(clock.elapsed()).unwrap_or_else(|_| TimeDelta::zero());
        let finished_at = started_at + elapsed;

        let stdout = join_reader(stdout_reader, "stdout")?;
        let stderr = join_reader(stderr_reader, "stderr")?;

        debug!(
            exit_code = ?status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "Child process exited"
        );

        Ok(ProcessOutput::new(
            stdout,
            stderr,
            status.code(),
            started_at,
            finished_at,
        ))
    }
}

type ReaderHandle = JoinHandle<Result<Vec<u8>, RunnerError>>;

fn spawn_reader<R>(pipe: Option<R>, stream: &'static str) -> ReaderHandle
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)
                .map_err(|source| RunnerError::StreamReadFailed { stream, source })?;
        }
        Ok(buf)
    })
}

fn join_reader(handle: ReaderHandle, stream: &'static str) -> Result<Vec<u8>, RunnerError> {
    handle.join().map_err(|_| RunnerError::WaitInterrupted {
        reason: format!("{stream} reader thread terminated unexpectedly"),
    })?
}

fn classify_wait_error(source: io::Error) -> RunnerError {
    if source.kind() == io::ErrorKind::Interrupted {
        RunnerError::WaitInterrupted {
            reason: source.to_string(),
        }
    } else {
        RunnerError::WaitFailed { source }
    }
}
