//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the `Commands` subcommand enum.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// taskrun - store named shell commands and run them on demand
#[derive(Parser, Debug)]
#[command(name = "taskrun")]
#[command(about = "Save named shell commands, run them through the host shell and keep their history")]
#[command(long_about = r#"
taskrun keeps a list of named tasks, each a shell command checked against a
blocklist of destructive patterns before it is saved. Saved tasks run through
the host shell ('sh -c' on POSIX, 'cmd.exe /C' on Windows) and every run is
recorded with its start time, end time and captured output.

EXAMPLES:
  # Save a task and let the store pick an id
  taskrun put --name list --command "ls -la"

  # Save a task under a chosen id
  taskrun put --name disk --command "df -h" --id disk

  # Run it and print the captured output
  taskrun exec disk

  # Show the three most recent runs as JSON
  taskrun history disk --limit 3 --json

  # Find tasks by name (case-insensitive)
  taskrun search DISK

  # Check the shell, the store and the configuration
  taskrun doctor

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is $TASKRUN_HOME/config.toml when TASKRUN_HOME is set, otherwise
  it is discovered by searching upward from CWD for .taskrun/config.toml
  Use --config to specify an explicit config file path

EXIT CODES:
  0 success, 1 internal, 2 invalid flags or configuration, 3 unsafe command,
  4 task not found, 5 task never validated, 6 store failure, 70 execution failure
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Task store file [default: .taskrun/tasks.json]
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Shell program used to run task commands
    #[arg(long, global = true)]
    pub shell: Option<String>,

    /// Flag passed to the shell before the command string (requires --shell)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub shell_flag: Option<String>,

    /// Shell platform (auto, posix, windows)
    #[arg(long, global = true)]
    pub platform: Option<String>,

    /// Target label recorded with each execution [default: local]
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format on stderr (compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a command and save it as a task
    Put {
        /// Human-readable task name
        #[arg(long)]
        name: String,

        /// Shell command line to store
        #[arg(long, allow_hyphen_values = true)]
        command: String,

        /// Task id to save under (generated when omitted; replaces an existing task)
        #[arg(long)]
        id: Option<String>,

        /// Output the saved task as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the name and/or command of a saved task
    #[command(group(ArgGroup::new("change").required(true).multiple(true)))]
    Update {
        /// Task id
        id: String,

        /// New task name
        #[arg(long, group = "change")]
        name: Option<String>,

        /// New shell command line (validated before it is saved)
        #[arg(long, group = "change", allow_hyphen_values = true)]
        command: Option<String>,

        /// Output the updated task as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single task
    Get {
        /// Task id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every saved task
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find tasks whose name contains NAME (case-insensitive)
    Search {
        /// Name fragment to look for
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a task and its execution history
    Delete {
        /// Task id
        id: String,
    },

    /// Run a task's command through the host shell and record the result
    Exec {
        /// Task id
        id: String,

        /// Output the execution record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the execution history of a task, oldest first
    History {
        /// Task id
        id: String,

        /// Only show the N most recent executions
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run environment health checks
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation name used in error reports and logs
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Put { .. } => "put",
            Self::Update { .. } => "update",
            Self::Get { .. } => "get",
            Self::List { .. } => "list",
            Self::Search { .. } => "search",
            Self::Delete { .. } => "delete",
            Self::Exec { .. } => "exec",
            Self::History { .. } => "history",
            Self::Doctor { .. } => "doctor",
        }
    }
}

/// Build the CLI command structure
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
