//! Error types for runner module

use std::io;
use thiserror::Error;

/// Process execution errors for task commands
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {stream} of child process: {source}")]
    StreamReadFailed {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for child process: {source}")]
    WaitFailed {
        #[source]
        source: io::Error,
    },

    #[error("Wait for child process was interrupted: {reason}")]
    WaitInterrupted { reason: String },

    #[error("Shell '{shell}' not found on PATH")]
    ShellNotFound { shell: String },
}

impl RunnerError {
    /// Whether the failure happened while waiting rather than while spawning or reading.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::WaitInterrupted { .. })
    }
}
