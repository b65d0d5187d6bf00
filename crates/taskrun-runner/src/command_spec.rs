use std::ffi::OsString;
use std::process::Command;

/// A process to spawn: one program plus discrete arguments.
///
/// A task's command line is never split here; it travels as a single argument
/// to the shell program chosen by [`Shell`](crate::Shell), and the shell does
/// the parsing. The child inherits the caller's environment and working
/// directory.
///
/// # Example
///
/// ```rust
/// use taskrun_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("sh").arg("-c").arg("echo hello");
///
/// assert_eq!(cmd.program, OsString::from("sh"));
/// assert_eq!(cmd.args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name as a lossy string, for logs and error messages.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Build the `std::process::Command`. Stdio is left to the runner.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_with_metacharacters_stays_one_argument() {
        let cmd = CommandSpec::new("sh")
            .arg("-c")
            .arg("echo out; echo err 1>&2 | cat");
        assert_eq!(
            cmd.args,
            vec![
                OsString::from("-c"),
                OsString::from("echo out; echo err 1>&2 | cat")
            ]
        );
    }

    #[test]
    fn test_program_name_is_lossy_string() {
        assert_eq!(CommandSpec::new("/bin/sh").program_name(), "/bin/sh");
        assert_eq!(CommandSpec::default().program_name(), "");
    }

    #[test]
    fn test_to_command_carries_program_and_args() {
        let std_cmd = CommandSpec::new("cmd.exe").arg("/C").arg("dir").to_command();
        assert_eq!(std_cmd.get_program(), "cmd.exe");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, vec!["/C", "dir"]);
    }
}
