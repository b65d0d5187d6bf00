//! Configuration management for taskrun
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. TOML files may carry `[defaults]`, `[store]` and
//! `[runner]` sections:
//!
//! ```toml
//! [defaults]
//! verbose = false
//! log_format = "compact"
//! target = "local"
//!
//! [store]
//! path = ".taskrun/tasks.json"
//!
//! [runner]
//! platform = "auto"
//! shell = "bash"
//! shell_flag = "-c"
//! ```

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use model::*;
pub use taskrun_utils::types::ConfigSource;

use camino::Utf8Path;
use taskrun_runner::{Shell, ShellMode};
use taskrun_utils::logging::LogFormat;

impl Config {
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    /// Log format; values are checked by [`validate`](Self::validate), so an
    /// unparsable one only appears on hand-built configs and reads as the default.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.defaults
            .log_format
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Default target label for executions.
    #[must_use]
    pub fn target(&self) -> &str {
        self.defaults.target.as_deref().unwrap_or(DEFAULT_TARGET)
    }

    #[must_use]
    pub fn store_path(&self) -> &Utf8Path {
        Utf8Path::new(self.store.path.as_deref().unwrap_or(DEFAULT_STORE_PATH))
    }

    #[must_use]
    pub fn shell_mode(&self) -> ShellMode {
        self.runner
            .platform
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Interpreter for task commands.
    ///
    /// The platform default, with `[runner] shell` replacing the program and
    /// `[runner] shell_flag` replacing the flag.
    #[must_use]
    pub fn shell(&self) -> Shell {
        let platform_default = Shell::for_mode(self.shell_mode());
        match &self.runner.shell {
            Some(program) => {
                let flag = self
                    .runner
                    .shell_flag
                    .clone()
                    .map_or(platform_default.flag, Into::into);
                Shell::new(program.as_str(), flag)
            }
            None => platform_default,
        }
    }

    /// Where a setting came from.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }
}
