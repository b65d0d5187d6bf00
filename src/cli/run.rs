//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Installs the tracing subscriber
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;
use tracing::{debug, error};

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, ExitCode, JsonFileTaskStore, TaskDraft, TaskRunError, TaskService};
use taskrun_utils::logging::init_tracing;

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints the error report to stderr, returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    let cli_args = build_cli_args(&cli);

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = TaskRunError::Config(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    if let Err(e) = init_tracing(config.verbose(), config.log_format()) {
        eprintln!("Warning: could not initialize logging: {e}");
    }

    let operation = cli.command.operation();
    debug!(
        operation,
        store = %config.store_path(),
        shell = %config.shell(),
        "Dispatching command"
    );

    match dispatch(cli.command, &config) {
        Ok(ExitCode::SUCCESS) => Ok(()),
        Ok(code) => Err(code),
        Err(err) => Err(report_error(&err, operation)),
    }
}

/// Map parsed flags onto configuration overrides.
pub(crate) fn build_cli_args(cli: &Cli) -> CliArgs {
    CliArgs {
        config_path: cli.config.clone(),
        store_path: cli.store.clone(),
        shell: cli.shell.clone(),
        shell_flag: cli.shell_flag.clone(),
        platform: cli.platform.clone(),
        target: cli.target.clone(),
        verbose: cli.verbose,
        log_format: cli.log_format.clone(),
    }
}

fn dispatch(command: Commands, config: &Config) -> anyhow::Result<ExitCode> {
    // Opening the store does not touch the disk.
    let service = TaskService::new(JsonFileTaskStore::open(config.store_path()))
        .with_shell(config.shell())
        .with_default_target(config.target());

    match command {
        Commands::Put {
            name,
            command,
            id,
            json,
        } => {
            let mut draft = TaskDraft::new(name, command);
            draft.id = id;
            commands::execute_put_command(&service, draft, json)?;
        }
        Commands::Update {
            id,
            name,
            command,
            json,
        } => {
            commands::execute_update_command(&service, &id, name, command, json)?;
        }
        Commands::Get { id, json } => {
            commands::execute_get_command(&service, &id, json)?;
        }
        Commands::List { json } => {
            commands::execute_list_command(&service, json)?;
        }
        Commands::Search { name, json } => {
            commands::execute_search_command(&service, &name, json)?;
        }
        Commands::Delete { id } => commands::execute_delete_command(&service, &id)?,
        Commands::Exec { id, json } => {
            commands::execute_exec_command(&service, &id, None, json)?;
        }
        Commands::History { id, limit, json } => {
            commands::execute_history_command(&service, &id, limit, json)?;
        }
        Commands::Doctor { json } => return commands::execute_doctor_command(json, config),
    }

    Ok(ExitCode::SUCCESS)
}

/// Print the report for a failed command and pick the exit code.
fn report_error(err: &anyhow::Error, operation: &str) -> ExitCode {
    if let Some(task_err) = err.downcast_ref::<TaskRunError>() {
        if task_err.is_expected() {
            debug!(operation, error = %task_err, "Command refused");
        } else {
            error!(operation, error = %format!("{err:#}"), "Command failed");
        }
        eprintln!("{}", task_err.display_for_user());
        return task_err.to_exit_code();
    }

    error!(operation, error = %format!("{err:#}"), "Unexpected failure");
    eprintln!("✗ Unexpected error during '{operation}': {err:#}");
    eprintln!("\n  General troubleshooting:");
    eprintln!("    - Run with --verbose for more detailed output");
    eprintln!("    - Run 'taskrun doctor' to check the shell and the task store");
    ExitCode::INTERNAL
}
