//! Exit code constants for taskrun.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `VALIDATION_FAILED` | Unsafe command or invalid task id |
//! | 4 | `NOT_FOUND` | Task id unknown or search matched nothing |
//! | 5 | `REJECTED` | Stored command was never validated |
//! | 6 | `STORE_FAILURE` | Task store could not be read or written |
//! | 70 | `EXECUTION_FAILURE` | Shell could not be spawned, read or waited for |

/// Exit codes matching the documented exit code table.
///
/// Use the named constants for common exit codes, or [`as_i32()`](Self::as_i32)
/// to get the numeric value for `std::process::exit()`.
///
/// The numeric values are part of the public API and will not change in 1.x
/// releases.
///
/// # Example
///
/// ```rust
/// use taskrun_utils::exit_codes::ExitCode;
///
/// let code = ExitCode::NOT_FOUND;
/// assert_eq!(code.as_i32(), 4);
/// assert_eq!(ExitCode::SUCCESS, ExitCode::from_i32(0));
/// ```
///
/// Use [`TaskRunError::to_exit_code()`](crate::error::TaskRunError::to_exit_code)
/// to map errors to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid flags or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Validation failed - the command matched the blocklist or the id is malformed
    pub const VALIDATION_FAILED: ExitCode = ExitCode(3);

    /// Not found - no task with the given id, or no task matched a search
    pub const NOT_FOUND: ExitCode = ExitCode(4);

    /// Rejected - the stored command never passed validation
    pub const REJECTED: ExitCode = ExitCode(5);

    /// Store failure - the task store could not be read or written
    pub const STORE_FAILURE: ExitCode = ExitCode(6);

    /// Execution failure - the shell could not be spawned, read, or waited for
    pub const EXECUTION_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
