//! CLI tests module
//!
//! Tests for argument parsing, command handlers and output rendering.

use super::commands::*;
use super::run::build_cli_args;
use super::*;
use chrono::{TimeZone, Utc};
use clap::Parser;
use std::path::PathBuf;

use crate::{InMemoryTaskStore, Task, TaskDraft, TaskExecution, TaskRunError, TaskService};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap_or_else(|e| panic!("failed to parse {args:?}: {e}"))
}

#[test]
fn test_cli_definition_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn test_put_parses_required_flags() {
    let cli = parse(&["taskrun", "put", "--name", "list", "--command", "ls -la"]);
    match cli.command {
        Commands::Put {
            name,
            command,
            id,
            json,
        } => {
            assert_eq!(name, "list");
            assert_eq!(command, "ls -la");
            assert_eq!(id, None);
            assert!(!json);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_put_requires_command() {
    assert!(Cli::try_parse_from(["taskrun", "put", "--name", "list"]).is_err());
}

#[test]
fn test_update_requires_a_change() {
    assert!(Cli::try_parse_from(["taskrun", "update", "t1"]).is_err());

    let cli = parse(&["taskrun", "update", "t1", "--name", "renamed"]);
    match cli.command {
        Commands::Update { id, name, command, .. } => {
            assert_eq!(id, "t1");
            assert_eq!(name.as_deref(), Some("renamed"));
            assert_eq!(command, None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&[
        "taskrun",
        "exec",
        "t1",
        "--store",
        "/tmp/tasks.json",
        "--target",
        "staging",
        "--shell",
        "bash",
        "--shell-flag",
        "-c",
        "-v",
    ]);

    let args = build_cli_args(&cli);
    assert_eq!(args.store_path, Some(PathBuf::from("/tmp/tasks.json")));
    assert_eq!(args.target.as_deref(), Some("staging"));
    assert_eq!(args.shell.as_deref(), Some("bash"));
    assert_eq!(args.shell_flag.as_deref(), Some("-c"));
    assert!(args.verbose);
    assert_eq!(args.config_path, None);
    assert_eq!(cli.command.operation(), "exec");
}

#[test]
fn test_history_limit_must_be_numeric() {
    assert!(Cli::try_parse_from(["taskrun", "history", "t1", "--limit", "many"]).is_err());

    let cli = parse(&["taskrun", "history", "t1", "--limit", "3", "--json"]);
    match cli.command {
        Commands::History { id, limit, json } => {
            assert_eq!(id, "t1");
            assert_eq!(limit, Some(3));
            assert!(json);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_operation_names_match_subcommands() {
    for (args, expected) in [
        (vec!["taskrun", "list"], "list"),
        (vec!["taskrun", "get", "x"], "get"),
        (vec!["taskrun", "search", "x"], "search"),
        (vec!["taskrun", "delete", "x"], "delete"),
        (vec!["taskrun", "doctor", "--json"], "doctor"),
    ] {
        assert_eq!(parse(&args).command.operation(), expected);
    }
}

#[test]
fn test_put_then_get_through_handlers() {
    let service = TaskService::new(InMemoryTaskStore::new());

    let saved = execute_put_command(&service, TaskDraft::new("disk", "df -h").with_id("disk"), true)
        .unwrap();
    assert_eq!(saved.id.as_deref(), Some("disk"));

    let fetched = execute_get_command(&service, "disk", false).unwrap();
    assert_eq!(fetched, saved);
}

#[test]
fn test_put_unsafe_command_surfaces_validation_error() {
    let service = TaskService::new(InMemoryTaskStore::new());

    let err = execute_put_command(&service, TaskDraft::new("wipe", "rm -rf /tmp/x"), false)
        .unwrap_err();

    let task_err = err.downcast_ref::<TaskRunError>().unwrap();
    assert!(matches!(task_err, TaskRunError::Validation { .. }));
    assert!(service.find_all().unwrap().is_empty());
}

#[test]
fn test_update_keeps_id() {
    let service = TaskService::new(InMemoryTaskStore::new());
    execute_put_command(&service, TaskDraft::new("disk", "df -h").with_id("disk"), false).unwrap();

    let updated =
        execute_update_command(&service, "disk", None, Some("du -sh".to_string()), false).unwrap();

    assert_eq!(updated.id.as_deref(), Some("disk"));
    assert_eq!(updated.name, "disk");
    assert_eq!(updated.command, "du -sh");
}

#[test]
fn test_search_without_matches_is_not_found() {
    let service = TaskService::new(InMemoryTaskStore::new());
    execute_put_command(&service, TaskDraft::new("Disk usage", "df -h"), false).unwrap();

    let found = execute_search_command(&service, "DISK", false).unwrap();
    assert_eq!(found.len(), 1);

    let err = execute_search_command(&service, "backup", false).unwrap_err();
    let task_err = err.downcast_ref::<TaskRunError>().unwrap();
    assert!(matches!(task_err, TaskRunError::NotFound { .. }));
    assert!(task_err.to_string().contains("backup"));
}

#[test]
fn test_list_on_empty_store_is_ok() {
    let service = TaskService::new(InMemoryTaskStore::new());
    assert!(execute_list_command(&service, false).unwrap().is_empty());
}

#[test]
fn test_delete_unknown_task_is_not_found() {
    let service = TaskService::new(InMemoryTaskStore::new());
    let err = execute_delete_command(&service, "ghost").unwrap_err();
    assert_eq!(
        err.downcast_ref::<TaskRunError>().unwrap().to_exit_code(),
        crate::ExitCode::NOT_FOUND
    );
}

#[test]
fn test_history_of_unknown_task_is_not_found() {
    let service = TaskService::new(InMemoryTaskStore::new());
    let err = execute_history_command(&service, "ghost", None, true).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TaskRunError>(),
        Some(TaskRunError::NotFound { .. })
    ));
}

#[test]
fn test_format_task_for_new_task() {
    let task = Task::new("disk", "df -h").with_id("disk");
    let text = format_task(&task);

    assert!(text.starts_with("Task disk"));
    assert!(text.contains("command:   df -h"));
    assert!(text.contains("validated: never"));
    assert!(text.contains("runs:      0"));
}

#[test]
fn test_format_task_line_without_id() {
    let task = Task::new("disk", "df -h");
    assert_eq!(format_task_line(&task), "-\tdisk\tdf -h");
}

#[test]
fn test_format_execution_indents_output() {
    let start = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let end = start + chrono::Duration::milliseconds(250);

    let text = format_execution(&TaskExecution::new(start, end, "one\ntwo".to_string()));
    assert!(text.contains("(250 ms)"));
    assert!(text.ends_with("\n  one\n  two"));

    let empty = format_execution(&TaskExecution::new(start, end, String::new()));
    assert!(empty.ends_with("(no output)"));
}

#[test]
fn test_task_json_uses_domain_field_names() {
    let json = emit_task_json(&Task::new("disk", "df -h").with_id("disk")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["id"], "disk");
    assert_eq!(value["name"], "disk");
    assert_eq!(value["command"], "df -h");
    assert!(value["executions"].as_array().unwrap().is_empty());
}

#[test]
fn test_history_json_is_an_array() {
    let start = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let runs = vec![TaskExecution::new(start, start, "ok".to_string())];

    let value: serde_json::Value = serde_json::from_str(&emit_history_json(&runs).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["output"], "ok");
}

#[cfg(unix)]
#[test]
fn test_exec_handler_runs_through_shell() {
    let service = TaskService::new(InMemoryTaskStore::new());
    execute_put_command(&service, TaskDraft::new("hello", "echo hello").with_id("hello"), false)
        .unwrap();

    let execution = execute_exec_command(&service, "hello", Some("ci"), false).unwrap();

    assert_eq!(execution.output, "hello");
    assert!(execution.start_time <= execution.end_time);
    assert_eq!(service.history("hello", None).unwrap(), vec![execution]);
}
