//! Host shell selection
//!
//! A task's command is a shell command line, so it is always run as
//! `<shell> <flag> <command>`. Which shell depends on the platform; this is the
//! only platform-conditional branch in the runner and it lives in
//! [`Shell::for_platform`]. Callers that need a different interpreter (tests,
//! configuration overrides) build a [`Shell`] directly with [`Shell::new`].

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::error::RunnerError;
use crate::types::{Platform, ShellMode};
use crate::CommandSpec;

/// Interpreter used to run task command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    /// Interpreter program, resolved through `PATH` at spawn time
    pub program: OsString,
    /// Flag telling the interpreter to run the next argument as a script
    pub flag: OsString,
}

impl Shell {
    /// Build a shell from an explicit program and "run string" flag.
    #[must_use]
    pub fn new(program: impl Into<OsString>, flag: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    /// Platform default: `cmd.exe /C` on Windows, `sh -c` everywhere else.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self::new("cmd.exe", "/C"),
            Platform::Posix => Self::new("sh", "-c"),
        }
    }

    /// Platform default for a configured [`ShellMode`].
    #[must_use]
    pub fn for_mode(mode: ShellMode) -> Self {
        Self::for_platform(mode.resolve())
    }

    /// Build the invocation for one command line.
    ///
    /// The command line is passed as a single argument; no quoting or
    /// splitting happens on our side.
    #[must_use]
    pub fn script(&self, command: &str) -> CommandSpec {
        CommandSpec::new(self.program.clone())
            .arg(self.flag.clone())
            .arg(command)
    }

    /// Resolve the interpreter on `PATH`.
    pub fn locate(&self) -> Result<PathBuf, RunnerError> {
        which::which(&self.program).map_err(|_| RunnerError::ShellNotFound {
            shell: self.program.to_string_lossy().into_owned(),
        })
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.program.to_string_lossy(),
            self.flag.to_string_lossy()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_uses_command_interpreter() {
        let shell = Shell::for_platform(Platform::Windows);
        assert_eq!(shell.program, OsString::from("cmd.exe"));
        assert_eq!(shell.flag, OsString::from("/C"));
    }

    #[test]
    fn test_posix_uses_sh_dash_c() {
        let shell = Shell::for_platform(Platform::Posix);
        assert_eq!(shell.to_string(), "sh -c");
    }

    #[test]
    fn test_script_passes_command_as_single_argument() {
        let spec = Shell::for_platform(Platform::Posix).script("echo hello world");
        assert_eq!(spec.program, OsString::from("sh"));
        assert_eq!(
            spec.args,
            vec![OsString::from("-c"), OsString::from("echo hello world")]
        );
    }

    #[test]
    fn test_for_mode_honours_explicit_platform() {
        assert_eq!(
            Shell::for_mode(ShellMode::Windows),
            Shell::for_platform(Platform::Windows)
        );
        assert_eq!(Shell::for_mode(ShellMode::Auto), Shell::default());
    }

    #[test]
    fn test_custom_shell_is_used_verbatim() {
        let spec = Shell::new("bash", "-lc").script("true");
        assert_eq!(spec.program, OsString::from("bash"));
        assert_eq!(spec.args[0], OsString::from("-lc"));
    }

    #[test]
    fn test_locate_missing_shell() {
        let shell = Shell::new("taskrun-no-such-shell-48151623", "-c");
        match shell.locate() {
            Err(RunnerError::ShellNotFound { shell }) => {
                assert_eq!(shell, "taskrun-no-such-shell-48151623");
            }
            other => panic!("expected ShellNotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_default_posix_shell() {
        assert!(Shell::for_platform(Platform::Posix).locate().is_ok());
    }
}
