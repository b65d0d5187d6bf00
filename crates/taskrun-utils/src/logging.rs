//! Logging and observability infrastructure for taskrun
//!
//! Structured logging with `tracing`. The CLI installs a subscriber once via
//! [`init_tracing`]; library crates only emit events. All log output goes to
//! stderr so command output on stdout stays machine-readable.

use serde::{Deserialize, Serialize};
use std::fmt as std_fmt;
use std::io::IsTerminal;
use std::str::FromStr;
use tracing::{Level, error, info, span};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "taskrun=info,warn";

/// Default filter when `RUST_LOG` is unset and verbose output was requested.
pub const VERBOSE_FILTER: &str = "taskrun=debug,info";

/// Longest output excerpt written into a single log event.
const OUTPUT_PREVIEW_CHARS: usize = 512;

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line events
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "Unknown log format: {other} (expected compact or json)"
            )),
        }
    }
}

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Filter directives used when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Verbose mode adds targets and
/// span close events (which carry span durations).
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool, format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let span_events = if verbose {
        fmt::format::FmtSpan::CLOSE
    } else {
        fmt::format::FmtSpan::NONE
    };

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true)
                        .with_span_events(span_events),
                )
                .try_init()?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_color())
                        .with_target(verbose)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .with_line_number(false)
                        .with_file(false)
                        .with_span_events(span_events)
                        .compact(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Span wrapping one task execution.
pub fn execution_span(task_id: &str, target: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "execution",
        task_id = %task_id,
        target = %target,
    )
}

/// Log the start of a task execution.
pub fn log_execution_start(task_id: &str, name: &str, command: &str, target: &str) {
    info!(
        task_id = %task_id,
        name = %name,
        command = %command,
        target = %target,
        "Running task"
    );
}

/// Log a finished execution with its exit status and an output excerpt.
pub fn log_execution_complete(
    task_id: &str,
    exit_code: Option<i32>,
    duration_ms: i64,
    output: &str,
) {
    info!(
        task_id = %task_id,
        exit_code = ?exit_code,
        duration_ms,
        output = %output_preview(output),
        "Task execution completed"
    );
}

/// Log a failed execution. Nothing was recorded for it.
pub fn log_execution_error(task_id: &str, error: &str) {
    error!(
        task_id = %task_id,
        error = %error,
        "Task execution failed"
    );
}

/// Truncate output for a log field, marking the cut.
#[must_use]
pub fn output_preview(output: &str) -> std::borrow::Cow<'_, str> {
    match output.char_indices().nth(OUTPUT_PREVIEW_CHARS) {
        None => std::borrow::Cow::Borrowed(output),
        Some((cut, _)) => {
            std::borrow::Cow::Owned(format!("{}… [{} bytes total]", &output[..cut], output.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        let err = "yaml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("yaml"));
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }

    #[test]
    fn test_log_format_serde_lowercase() {
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), "\"json\"");
        let parsed: LogFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(parsed, LogFormat::Compact);
    }

    #[test]
    fn test_default_filter_directives_parse() {
        for verbose in [false, true] {
            let directives = default_filter(verbose);
            assert!(directives.starts_with("taskrun="));
            assert!(EnvFilter::try_new(directives).is_ok());
        }
    }

    #[test]
    fn test_output_preview_short_output_borrowed() {
        let preview = output_preview("hello");
        assert!(matches!(preview, std::borrow::Cow::Borrowed("hello")));
    }

    #[test]
    fn test_output_preview_truncates_on_char_boundary() {
        let long = "é".repeat(OUTPUT_PREVIEW_CHARS + 10);
        let preview = output_preview(&long);
        assert!(preview.starts_with(&"é".repeat(OUTPUT_PREVIEW_CHARS)));
        assert!(preview.ends_with(&format!("[{} bytes total]", long.len())));
    }

    #[test]
    fn test_logging_helpers_without_subscriber() {
        let span = execution_span("task-1", "local");
        let _guard = span.enter();
        log_execution_start("task-1", "list", "echo hello", "local");
        log_execution_complete("task-1", Some(0), 3, "hello");
        log_execution_error("task-1", "spawn failed");
    }
}
