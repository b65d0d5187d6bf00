use crate::error::RunnerError;
use chrono::{DateTime, Utc};

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - Synchronous Process Execution Interface
// ============================================================================

/// Output from a finished child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output, drained to EOF
    pub stdout: Vec<u8>,
    /// Standard error, drained to EOF
    pub stderr: Vec<u8>,
    /// Exit code (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Instant immediately before spawn
    pub started_at: DateTime<Utc>,
    /// Instant immediately after the wait returned
    pub finished_at: DateTime<Utc>,
}

impl ProcessOutput {
    #[must_use]
    pub fn new(
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        exit_code: Option<i32>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            started_at,
            finished_at,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Check if the process exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Wall-clock time between spawn and exit.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Combined output as recorded in a task execution.
    ///
    /// Every stdout line followed by `\n`, then every stderr line followed by
    /// `\n`, then trimmed. Stdout always precedes stderr regardless of how the
    /// child interleaved them.
    ///
    /// A line ends at `\n`, `\r\n` or a lone `\r`. Trimming removes every
    /// leading and trailing character at or below U+0020 (control characters
    /// included) and keeps other Unicode whitespace such as U+00A0.
    #[must_use]
    pub fn merged_output(&self) -> String {
        let mut merged = String::with_capacity(self.stdout.len() + self.stderr.len());
        for stream in [&self.stdout, &self.stderr] {
            for line in split_lines(&String::from_utf8_lossy(stream)) {
                merged.push_str(line);
                merged.push('\n');
            }
        }
        merged.trim_matches(|c: char| c <= '\u{20}').to_string()
    }
}

/// Split on `\n`, `\r\n` or a lone `\r`; a final terminator adds no empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Trait for process execution.
///
/// Runs a [`CommandSpec`] to completion and returns everything it wrote.
/// The call blocks for the whole lifetime of the child; there is no timeout
/// and no cancellation. A non-zero exit is a normal `Ok` result; only spawn,
/// read and wait failures are errors.
///
/// # Example
///
/// ```rust
/// use taskrun_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
/// use chrono::Utc;
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, _cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
///         let now = Utc::now();
///         Ok(ProcessOutput::new(b"hello\n".to_vec(), Vec::new(), Some(0), now, now))
///     }
/// }
///
/// let output = CannedRunner.run(&CommandSpec::new("sh")).unwrap();
/// assert_eq!(output.merged_output(), "hello");
/// ```
pub trait ProcessRunner {
    /// Spawn `cmd`, drain both output streams, and wait for exit.
    ///
    /// # Errors
    ///
    /// * `RunnerError::SpawnFailed` - the program could not be started
    /// * `RunnerError::StreamReadFailed` - an output stream could not be read
    /// * `RunnerError::WaitFailed` / `RunnerError::WaitInterrupted` - waiting failed
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &[u8], stderr: &[u8], exit_code: Option<i32>) -> ProcessOutput {
        let now = Utc::now();
        ProcessOutput::new(stdout.to_vec(), stderr.to_vec(), exit_code, now, now)
    }

    #[test]
    fn test_merged_output_puts_stdout_before_stderr() {
        let out = output(b"first\nsecond\n", b"oops\n", Some(1));
        assert_eq!(out.merged_output(), "first\nsecond\noops");
    }

    #[test]
    fn test_merged_output_terminates_unterminated_lines() {
        // A stdout tail without newline must not glue onto the first stderr line
        let out = output(b"no-newline", b"err", Some(0));
        assert_eq!(out.merged_output(), "no-newline\nerr");
    }

    #[test]
    fn test_merged_output_normalises_crlf() {
        let out = output(b"a\r\nb\r\n", b"", Some(0));
        assert_eq!(out.merged_output(), "a\nb");
    }

    #[test]
    fn test_merged_output_treats_lone_cr_as_line_end() {
        let out = output(b"a\rb\r", b"err", Some(0));
        assert_eq!(out.merged_output(), "a\nb\nerr");
    }

    #[test]
    fn test_merged_output_mixed_terminators() {
        let out = output(b"one\r\ntwo\rthree\nfour", b"\r\rlast\r\n", Some(0));
        assert_eq!(out.merged_output(), "one\ntwo\nthree\nfour\n\n\nlast");
    }

    #[test]
    fn test_split_lines_keeps_interior_blank_lines() {
        assert_eq!(split_lines("a\n\nb"), ["a", "", "b"]);
        assert_eq!(split_lines("a\r\n"), ["a"]);
        assert_eq!(split_lines("\r"), [""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_merged_output_trims_control_characters_but_not_nbsp() {
        let out = output(b"\x00\x1b hi \x07", b"", Some(0));
        assert_eq!(out.merged_output(), "hi");

        let out = output("\u{a0}kept\u{a0}\n".as_bytes(), b"\t", Some(0));
        assert_eq!(out.merged_output(), "\u{a0}kept\u{a0}");
    }

    #[test]
    fn test_merged_output_trims_surrounding_whitespace() {
        let out = output(b"\n\n  hello  \n\n", b"\n", Some(0));
        assert_eq!(out.merged_output(), "hello");
    }

    #[test]
    fn test_merged_output_empty_streams() {
        assert_eq!(output(b"", b"", Some(0)).merged_output(), "");
    }

    #[test]
    fn test_merged_output_lossy_utf8() {
        let out = output(&[0xff, b'o', b'k'], b"", Some(0));
        assert_eq!(out.merged_output(), "\u{fffd}ok");
    }

    #[test]
    fn test_success_only_for_exit_zero() {
        assert!(output(b"", b"", Some(0)).success());
        assert!(!output(b"", b"", Some(2)).success());
        assert!(!output(b"", b"", None).success());
    }

    #[test]
    fn test_duration_is_non_negative() {
        let started = Utc::now();
        let finished = started + chrono::Duration::milliseconds(25);
        let out = ProcessOutput::new(Vec::new(), Vec::new(), Some(0), started, finished);
        assert_eq!(out.duration_ms(), 25);
    }

    struct FailingRunner;

    impl ProcessRunner for FailingRunner {
        fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
            Err(RunnerError::SpawnFailed {
                program: cmd.program_name(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    #[test]
    fn test_process_runner_error_is_propagated() {
        let result = FailingRunner.run(&CommandSpec::new("missing-shell"));
        match result {
            Err(RunnerError::SpawnFailed { program, .. }) => assert_eq!(program, "missing-shell"),
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }
}
