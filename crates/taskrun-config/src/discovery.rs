use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;

use taskrun_utils::error::ConfigError;
use taskrun_utils::types::ConfigSource;

use crate::model::{
    CONFIG_FILE_NAME, Config, Defaults, HOME_ENV, RunnerConfig, STATE_DIR_NAME, STORE_FILE_NAME,
    StoreConfig,
};
use crate::CliArgs;

/// Directories that end the upward config search.
const REPO_ROOT_MARKERS: &[&str] = &[".git", ".hg", ".svn"];

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<Defaults>,
    store: Option<StoreConfig>,
    runner: Option<RunnerConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Reads the working directory and `TASKRUN_HOME` from the process
    /// environment, then defers to [`discover_from`](Self::discover_from).
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("cannot read current directory: {e}"),
        })?;
        let home = env::var_os(HOME_ENV)
            .filter(|value| !value.is_empty())
            .map(std::path::PathBuf::from);
        Self::discover_from(&start_dir, home.as_deref(), cli_args)
    }

    /// Discover and load configuration from an explicit directory and home.
    ///
    /// This is the path-driven variant used by tests to avoid process-global
    /// state. The config file is, in order: `cli_args.config_path`,
    /// `<home>/config.toml` when `home` is given, or the first
    /// `.taskrun/config.toml` found walking up from `start_dir`.
    ///
    /// Relative store paths are resolved here so the returned config never
    /// depends on the working directory again: CLI paths against
    /// `start_dir`, file paths against the project the file belongs to.
    pub fn discover_from(
        start_dir: &Path,
        home: Option<&Path>,
        cli_args: &CliArgs,
    ) -> Result<Self, ConfigError> {
        let start_dir = utf8_path(start_dir)?;
        let home = home.map(utf8_path).transpose()?;

        let mut source_attribution = HashMap::new();
        let mut defaults = Defaults::default();
        let mut runner = RunnerConfig::default();
        let mut store = StoreConfig { path: None };

        for key in ["verbose", "log_format", "target", "platform", "store_path"] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let config_file = match &cli_args.config_path {
            Some(explicit) => {
                let explicit = start_dir.join(utf8_path(explicit)?);
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.to_string(),
                    });
                }
                Some(explicit)
            }
            None => match &home {
                Some(home) => Some(home.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
                None => Self::discover_config_file_from(&start_dir),
            },
        };

        let state_dir = match (&home, &config_file) {
            (Some(home), _) => home.clone(),
            (None, Some(file)) => project_root(file).join(STATE_DIR_NAME),
            (None, None) => start_dir.join(STATE_DIR_NAME),
        };

        if let Some(path) = &config_file {
            let file_config = Self::load_config_file(path)
                .map_err(|e| ConfigError::InvalidFile(format!("{e:#}")))?;
            let source = ConfigSource::Config;

            if let Some(file_defaults) = file_config.defaults {
                if file_defaults.verbose.is_some() {
                    defaults.verbose = file_defaults.verbose;
                    source_attribution.insert("verbose".to_string(), source);
                }
                if file_defaults.log_format.is_some() {
                    defaults.log_format = file_defaults.log_format;
                    source_attribution.insert("log_format".to_string(), source);
                }
                if file_defaults.target.is_some() {
                    defaults.target = file_defaults.target;
                    source_attribution.insert("target".to_string(), source);
                }
            }

            if let Some(file_store) = file_config.store
                && let Some(raw) = file_store.path
            {
                store.path = Some(resolve_store_path(&project_root(path), &raw)?);
                source_attribution.insert("store_path".to_string(), source);
            }

            if let Some(file_runner) = file_config.runner {
                if file_runner.platform.is_some() {
                    runner.platform = file_runner.platform;
                    source_attribution.insert("platform".to_string(), source);
                }
                if file_runner.shell.is_some() {
                    runner.shell = file_runner.shell;
                    source_attribution.insert("shell".to_string(), source);
                }
                if file_runner.shell_flag.is_some() {
                    runner.shell_flag = file_runner.shell_flag;
                    source_attribution.insert("shell_flag".to_string(), source);
                }
            }

            tracing::debug!(path = %path, "Loaded configuration file");
        }

        // CLI overrides
        if cli_args.verbose {
            defaults.verbose = Some(true);
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }
        if let Some(log_format) = &cli_args.log_format {
            defaults.log_format = Some(log_format.clone());
            source_attribution.insert("log_format".to_string(), ConfigSource::Cli);
        }
        if let Some(target) = &cli_args.target {
            defaults.target = Some(target.clone());
            source_attribution.insert("target".to_string(), ConfigSource::Cli);
        }
        if let Some(raw) = &cli_args.store_path {
            let raw = utf8_path(raw)?;
            store.path = Some(resolve_store_path(&start_dir, raw.as_str())?);
            source_attribution.insert("store_path".to_string(), ConfigSource::Cli);
        }
        if let Some(platform) = &cli_args.platform {
            runner.platform = Some(platform.clone());
            source_attribution.insert("platform".to_string(), ConfigSource::Cli);
        }
        if let Some(shell) = &cli_args.shell {
            runner.shell = Some(shell.clone());
            source_attribution.insert("shell".to_string(), ConfigSource::Cli);
        }
        if let Some(shell_flag) = &cli_args.shell_flag {
            runner.shell_flag = Some(shell_flag.clone());
            source_attribution.insert("shell_flag".to_string(), ConfigSource::Cli);
        }

        if store.path.is_none() {
            store.path = Some(state_dir.join(STORE_FILE_NAME).into_string());
        }

        let config = Self {
            defaults,
            store,
            runner,
            config_file,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.taskrun/config.toml`,
    /// stopping at repository root markers (.git, .hg, .svn) or the
    /// filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let candidate = dir.join(STATE_DIR_NAME).join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            if REPO_ROOT_MARKERS
                .iter()
                .any(|marker| dir.join(marker).exists())
            {
                break;
            }

            current = dir.parent();
        }

        None
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Utf8Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {path}"))?;
        Ok(config)
    }
}

/// Directory a config file's relative paths are anchored to.
///
/// For `<root>/.taskrun/config.toml` that is `<root>`; for any other file it
/// is the file's own directory.
fn project_root(config_file: &Utf8Path) -> Utf8PathBuf {
    let dir = config_file.parent().unwrap_or_else(|| Utf8Path::new("."));
    match dir.file_name() {
        Some(STATE_DIR_NAME) => dir.parent().unwrap_or(dir).to_path_buf(),
        _ => dir.to_path_buf(),
    }
}

fn resolve_store_path(base: &Utf8Path, raw: &str) -> Result<String, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "store_path".to_string(),
            value: "store path must not be empty".to_string(),
        });
    }
    Ok(base.join(raw).into_string())
}

fn utf8_path(path: &Path) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|path| {
        ConfigError::DiscoveryFailed {
            reason: format!("path is not valid UTF-8: {}", path.display()),
        }
    })
}
