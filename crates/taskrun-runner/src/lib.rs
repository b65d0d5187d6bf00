//! Shell selection and synchronous process execution for task commands
//!
//! A task command is an opaque command line handed to the host shell. This
//! crate owns that hand-off: [`Shell`] picks the interpreter, [`CommandSpec`]
//! describes the invocation, and a [`ProcessRunner`] (normally
//! [`NativeRunner`]) spawns it, drains both output streams and waits for
//! exit.
//!
//! # Argument handling
//!
//! All process execution goes through [`CommandSpec`]. The command line is
//! never tokenised here; it travels as a single argument after the shell's
//! "run string" flag.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;
pub mod shell;
pub mod types;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
pub use shell::Shell;
pub use types::{Platform, ShellMode};
