//! CLI command implementations (facade).
//!
//! This module re-exports the command surface used by `run.rs` and CLI tests.
//! Implementations live in `commands/*`. Handlers print their own output and
//! return the record they printed.

// Renderers are re-exported for the CLI tests.
#![allow(unused_imports)]

mod common;
mod delete;
mod doctor;
mod exec;
mod history;
mod json_emit;
mod lookup;
mod save;

pub use delete::execute_delete_command;
pub use doctor::execute_doctor_command;
pub use exec::execute_exec_command;
pub use history::execute_history_command;
pub use lookup::{execute_get_command, execute_list_command, execute_search_command};
pub use save::{execute_put_command, execute_update_command};

pub use common::{format_execution, format_task, format_task_line};
pub use json_emit::{
    emit_doctor_json, emit_execution_json, emit_history_json, emit_task_json, emit_tasks_json,
};
