use std::collections::HashMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use taskrun_utils::types::ConfigSource;

/// Environment variable naming the taskrun home directory.
pub const HOME_ENV: &str = "TASKRUN_HOME";

/// Per-project state directory name.
pub const STATE_DIR_NAME: &str = ".taskrun";

/// Configuration file name inside the state directory (or `TASKRUN_HOME`).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Task store file name inside the state directory.
pub const STORE_FILE_NAME: &str = "tasks.json";

/// Store location used when nothing else is known.
pub const DEFAULT_STORE_PATH: &str = ".taskrun/tasks.json";

/// Target label recorded when neither the caller nor the configuration names one.
pub const DEFAULT_TARGET: &str = "local";

/// Final taskrun configuration with every value's origin recorded.
#[derive(Debug, Clone)]
pub struct Config {
    pub defaults: Defaults,
    pub store: StoreConfig,
    pub runner: RunnerConfig,
    /// Configuration file that was loaded, if any
    pub config_file: Option<Utf8PathBuf>,
    /// Source attribution for each setting
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[defaults]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub verbose: Option<bool>,
    pub log_format: Option<String>,
    pub target: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            verbose: Some(false),
            log_format: Some("compact".to_string()),
            target: Some(DEFAULT_TARGET.to_string()),
        }
    }
}

/// `[store]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Some(DEFAULT_STORE_PATH.to_string()),
        }
    }
}

/// `[runner]` section
///
/// `shell` and `shell_flag` replace the platform default interpreter; when
/// only `shell` is set the platform's flag is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    pub platform: Option<String>,
    pub shell: Option<String>,
    pub shell_flag: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            platform: Some("auto".to_string()),
            shell: None,
            shell_flag: None,
        }
    }
}
