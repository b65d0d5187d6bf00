//! Command safety check for task commands
//!
//! A task command is a shell command line that will later be handed to the
//! host shell verbatim. Before a command is saved it must pass this check: a
//! case-insensitive substring blocklist of destructive programs and shell
//! operators.
//!
//! This is a coarse filter, not a sandbox. Anything not on the list
//! (backticks, `$(...)`, `<`, newlines) reaches the shell unchanged.

use thiserror::Error;

/// Substrings that make a command unsafe, matched against the lower-cased
/// command. Order is the reporting order when several match.
pub const BLOCKED_PATTERNS: &[&str] = &[
    "rm ", "sudo", "shutdown", "reboot", "mkfs", "dd ", ">", "|", "&", ";",
];

/// Why a command was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsafeCommand {
    #[error("command is empty")]
    Empty,

    #[error("command contains blocked pattern '{pattern}'")]
    BlockedPattern { pattern: &'static str },
}

/// Command safety validator
pub struct CommandValidator;

impl CommandValidator {
    /// Check a command, reporting the first rule that fired.
    ///
    /// `None` and `""` are refused. Matching is case-insensitive.
    ///
    /// # Example
    ///
    /// ```rust
    /// use taskrun_validation::{CommandValidator, UnsafeCommand};
    ///
    /// assert!(CommandValidator::check(Some("echo hello")).is_ok());
    /// assert_eq!(
    ///     CommandValidator::check(Some("SUDO reboot")),
    ///     Err(UnsafeCommand::BlockedPattern { pattern: "sudo" })
    /// );
    /// ```
    pub fn check(command: Option<&str>) -> Result<(), UnsafeCommand> {
        let command = match command {
            Some(command) if !command.is_empty() => command,
            _ => return Err(UnsafeCommand::Empty),
        };

        let lower = command.to_lowercase();
        match Self::first_blocked_pattern(&lower) {
            Some(pattern) => Err(UnsafeCommand::BlockedPattern { pattern }),
            None => Ok(()),
        }
    }

    /// Boolean form of [`check`](Self::check).
    #[must_use]
    pub fn is_safe(command: Option<&str>) -> bool {
        Self::check(command).is_ok()
    }

    fn first_blocked_pattern(lower: &str) -> Option<&'static str> {
        BLOCKED_PATTERNS
            .iter()
            .copied()
            .find(|pattern| lower.contains(pattern))
    }
}

/// Shorthand for [`CommandValidator::is_safe`].
#[must_use]
pub fn is_safe(command: Option<&str>) -> bool {
    CommandValidator::is_safe(command)
}

/// Shorthand for [`CommandValidator::check`].
pub fn check(command: Option<&str>) -> Result<(), UnsafeCommand> {
    CommandValidator::check(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_absent_and_empty_commands_are_unsafe() {
        assert!(!is_safe(None));
        assert!(!is_safe(Some("")));
        assert_eq!(check(None), Err(UnsafeCommand::Empty));
    }

    #[test]
    fn test_plain_commands_are_safe() {
        for command in ["echo hello", "ls -la", "date", "uname -a", "git status"] {
            assert!(is_safe(Some(command)), "{command} should be safe");
        }
    }

    #[test]
    fn test_each_blocked_pattern_is_reported() {
        let cases = [
            ("rm -rf /tmp/x", "rm "),
            ("sudo ls", "sudo"),
            ("shutdown now", "shutdown"),
            ("reboot", "reboot"),
            ("mkfs.ext4 /dev/sda1", "mkfs"),
            ("dd if=/dev/zero", "dd "),
            ("echo hi > out.txt", ">"),
            ("cat x | wc", "|"),
            ("sleep 10 &", "&"),
            ("echo a; echo b", ";"),
        ];
        for (command, pattern) in cases {
            assert_eq!(
                check(Some(command)),
                Err(UnsafeCommand::BlockedPattern { pattern }),
                "{command}"
            );
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(!is_safe(Some("SuDo whoami")));
        assert!(!is_safe(Some("RM -rf build")));
        assert!(!is_safe(Some("ShutDown -h")));
    }

    #[test]
    fn test_patterns_with_trailing_space_need_the_space() {
        // Substring semantics: "rm" and "dd" alone are fine, "rm " is not.
        assert!(is_safe(Some("echo rm")));
        assert!(is_safe(Some("firmware --add")));
        assert!(is_safe(Some("echo perform")));
        assert!(!is_safe(Some("echo confirm now")));
        assert!(!is_safe(Some("echo add it")));
    }

    #[test]
    fn test_unlisted_metacharacters_pass_through() {
        assert!(is_safe(Some("echo $(whoami)")));
        assert!(is_safe(Some("echo `date`")));
        assert!(is_safe(Some("   ")));
    }

    #[test]
    fn test_first_listed_pattern_wins() {
        assert_eq!(
            check(Some("sudo rm -rf / ; reboot")),
            Err(UnsafeCommand::BlockedPattern { pattern: "rm " })
        );
    }

    #[test]
    fn test_reason_text() {
        let err = check(Some("cat a | b")).unwrap_err();
        assert_eq!(err.to_string(), "command contains blocked pattern '|'");
        assert_eq!(UnsafeCommand::Empty.to_string(), "command is empty");
    }

    fn randomly_cased(pattern: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), pattern.len()).prop_map(move |upper| {
            pattern
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    fn command_with_blocked_pattern() -> impl Strategy<Value = String> {
        proptest::sample::select(BLOCKED_PATTERNS.to_vec())
            .prop_flat_map(|pattern| ("\\PC{0,20}", randomly_cased(pattern), "\\PC{0,20}"))
            .prop_map(|(prefix, pattern, suffix)| format!("{prefix}{pattern}{suffix}"))
    }

    proptest! {
        #[test]
        fn prop_any_blocked_pattern_makes_command_unsafe(command in command_with_blocked_pattern()) {
            prop_assert!(!is_safe(Some(&command)));
        }

        #[test]
        fn prop_commands_without_blocked_patterns_are_safe(command in "[a-zA-Z0-9 ._/=:,+-]{1,40}") {
            let lower = command.to_lowercase();
            prop_assume!(BLOCKED_PATTERNS.iter().all(|p| !lower.contains(p)));
            prop_assert!(is_safe(Some(&command)));
        }

        #[test]
        fn prop_check_is_deterministic(command in "\\PC{0,40}") {
            prop_assert_eq!(check(Some(&command)), check(Some(&command)));
        }
    }
}
