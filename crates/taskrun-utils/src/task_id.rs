//! Task id sanitization
//!
//! Client-supplied task ids end up in store documents, log fields and shell
//! history, so they are restricted to a small portable alphabet.

use crate::error::{ErrorCategory, UserFriendlyError};
use unicode_normalization::UnicodeNormalization;

/// Error type for task id validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskIdError {
    #[error("Task id is empty")]
    Empty,

    #[error("Task id contains only invalid characters")]
    OnlyInvalidCharacters,
}

impl UserFriendlyError for TaskIdError {
    fn user_message(&self) -> String {
        match self {
            Self::Empty => "The task id is empty".to_string(),
            Self::OnlyInvalidCharacters => {
                "The task id contains only invalid characters (no alphanumeric, dots, or dashes)"
                    .to_string()
            }
        }
    }

    fn context(&self) -> Option<String> {
        Some("Only ASCII alphanumeric characters, dots (.), dashes (-), and underscores (_) are allowed in task ids. Other characters are replaced with underscores.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Empty => vec![
                "Omit --id to let taskrun generate one".to_string(),
                "Example: nightly-backup, build.release, deploy_v2".to_string(),
            ],
            Self::OnlyInvalidCharacters => vec![
                "Include at least one alphanumeric character, dot, or dash".to_string(),
                "Valid characters: A-Z, a-z, 0-9, . (dot), - (dash), _ (underscore)".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

/// Sanitizes a client-supplied task id.
///
/// - Normalizes Unicode with NFKC to handle confusables
/// - Accepts only `[A-Za-z0-9._-]`, replacing anything else with `_`
/// - Collapses `..` runs so ids never look like path traversal
/// - Rejects ids that are empty or have no meaningful characters left
///
/// # Examples
///
/// ```
/// use taskrun_utils::task_id::sanitize_task_id;
///
/// assert_eq!(sanitize_task_id("nightly-backup_1").unwrap(), "nightly-backup_1");
/// assert_eq!(sanitize_task_id("my task!").unwrap(), "my_task_");
/// assert_eq!(sanitize_task_id("ｂｕｉｌｄ").unwrap(), "build");
/// assert!(sanitize_task_id("").is_err());
/// ```
pub fn sanitize_task_id(id: &str) -> Result<String, TaskIdError> {
    let normalized: String = id.nfkc().collect();

    let mut sanitized: String = normalized
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", "__");
    }

    if sanitized.is_empty() {
        return Err(TaskIdError::Empty);
    }

    let has_meaningful_content = sanitized
        .chars()
        .any(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !has_meaningful_content {
        return Err(TaskIdError::OnlyInvalidCharacters);
    }

    if sanitized != id {
        tracing::warn!(original = %id, sanitized = %sanitized, "Task id sanitized");
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_ids_pass_through() {
        for id in ["task-1a2b3c4d5e6f", "build.release", "deploy_v2", "A-Z.09"] {
            assert_eq!(sanitize_task_id(id).unwrap(), id);
        }
    }

    #[test]
    fn test_invalid_characters_replaced() {
        assert_eq!(sanitize_task_id("a/b\\c").unwrap(), "a_b_c");
        assert_eq!(sanitize_task_id("tab\there").unwrap(), "tab_here");
        assert_eq!(sanitize_task_id("café").unwrap(), "caf_");
    }

    #[test]
    fn test_dot_runs_are_collapsed() {
        assert_eq!(sanitize_task_id("../etc").unwrap(), "___etc");
        assert_eq!(sanitize_task_id("a...b").unwrap(), "a__.b");
    }

    #[test]
    fn test_empty_and_meaningless_ids_rejected() {
        assert_eq!(sanitize_task_id(""), Err(TaskIdError::Empty));
        assert_eq!(
            sanitize_task_id("   "),
            Err(TaskIdError::OnlyInvalidCharacters)
        );
        assert_eq!(
            sanitize_task_id("!@#"),
            Err(TaskIdError::OnlyInvalidCharacters)
        );
    }

    #[test]
    fn test_fullwidth_confusables_normalized() {
        assert_eq!(sanitize_task_id("ｔａｓｋ－１").unwrap(), "task-1");
    }

    proptest! {
        #[test]
        fn prop_sanitized_ids_use_portable_alphabet(id in "\\PC{0,32}") {
            if let Ok(clean) = sanitize_task_id(&id) {
                prop_assert!(!clean.is_empty());
                prop_assert!(!clean.contains(".."));
                prop_assert!(clean
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
            }
        }

        #[test]
        fn prop_sanitize_is_idempotent(id in "[a-zA-Z0-9 ._/-]{1,24}") {
            if let Ok(once) = sanitize_task_id(&id) {
                prop_assert_eq!(sanitize_task_id(&once).unwrap(), once.clone());
            }
        }
    }
}
