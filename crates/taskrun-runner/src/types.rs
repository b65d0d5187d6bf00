//! Types used by the runner module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shell selection modes for task command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellMode {
    /// Detect the host platform at run time
    #[default]
    Auto,
    /// POSIX shell (`sh -c`)
    Posix,
    /// Windows command interpreter (`cmd.exe /C`)
    Windows,
}

impl ShellMode {
    /// Convert shell mode to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Posix => "posix",
            Self::Windows => "windows",
        }
    }

    /// Resolve the mode to a concrete platform.
    ///
    /// `Auto` consults [`Platform::current`]; explicit modes are returned as-is.
    #[must_use]
    pub fn resolve(self) -> Platform {
        match self {
            Self::Auto => Platform::current(),
            Self::Posix => Platform::Posix,
            Self::Windows => Platform::Windows,
        }
    }
}

impl fmt::Display for ShellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShellMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "posix" => Ok(Self::Posix),
            "windows" => Ok(Self::Windows),
            other => Err(format!(
                "Unknown shell platform: {other} (expected auto, posix or windows)"
            )),
        }
    }
}

/// Host platform family, as far as shell invocation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// Platform of the running binary.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Windows => "windows",
        }
    }
}
