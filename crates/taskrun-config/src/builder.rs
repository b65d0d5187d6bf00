use std::collections::HashMap;

use camino::Utf8PathBuf;
use taskrun_utils::error::ConfigError;
use taskrun_utils::types::ConfigSource;

use crate::model::{Config, Defaults, RunnerConfig, StoreConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use taskrun_config::Config;
    ///
    /// let config = Config::builder()
    ///     .store_path("/tmp/taskrun/tasks.json")
    ///     .target("pod-7")
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.target(), "pod-7");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration of taskrun.
///
/// Nothing is read from the environment or the file system. Values set on the
/// builder are attributed to `ConfigSource::Programmatic`; everything else
/// keeps its built-in default.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    verbose: Option<bool>,
    log_format: Option<String>,
    target: Option<String>,
    store_path: Option<String>,
    platform: Option<String>,
    shell: Option<String>,
    shell_flag: Option<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// `compact` or `json`
    #[must_use]
    pub fn log_format(mut self, format: impl Into<String>) -> Self {
        self.log_format = Some(format.into());
        self
    }

    /// Default target label for executions.
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Task store file. Used as given; relative paths stay relative.
    #[must_use]
    pub fn store_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.store_path = Some(path.into().into_string());
        self
    }

    /// `auto`, `posix` or `windows`
    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    #[must_use]
    pub fn shell(mut self, program: impl Into<String>) -> Self {
        self.shell = Some(program.into());
        self
    }

    #[must_use]
    pub fn shell_flag(mut self, flag: impl Into<String>) -> Self {
        self.shell_flag = Some(flag.into());
        self
    }

    /// Build the configuration and validate it.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut defaults = Defaults::default();
        let mut store = StoreConfig::default();
        let mut runner = RunnerConfig::default();

        for key in ["verbose", "log_format", "target", "platform", "store_path"] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let mut set = |key: &str| {
            source_attribution.insert(key.to_string(), ConfigSource::Programmatic);
        };

        if let Some(verbose) = self.verbose {
            defaults.verbose = Some(verbose);
            set("verbose");
        }
        if let Some(log_format) = self.log_format {
            defaults.log_format = Some(log_format);
            set("log_format");
        }
        if let Some(target) = self.target {
            defaults.target = Some(target);
            set("target");
        }
        if let Some(path) = self.store_path {
            store.path = Some(path);
            set("store_path");
        }
        if let Some(platform) = self.platform {
            runner.platform = Some(platform);
            set("platform");
        }
        if let Some(shell) = self.shell {
            runner.shell = Some(shell);
            set("shell");
        }
        if let Some(shell_flag) = self.shell_flag {
            runner.shell_flag = Some(shell_flag);
            set("shell_flag");
        }

        let config = Config {
            defaults,
            store,
            runner,
            config_file: None,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }
}
