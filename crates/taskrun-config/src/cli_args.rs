use std::path::PathBuf;

/// Configuration overrides collected from command-line flags.
///
/// Every field left at `None`/`false` falls through to the config file and
/// then to built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file (skips discovery)
    pub config_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub shell: Option<String>,
    pub shell_flag: Option<String>,
    pub platform: Option<String>,
    pub target: Option<String>,
    pub verbose: bool,
    pub log_format: Option<String>,
}
