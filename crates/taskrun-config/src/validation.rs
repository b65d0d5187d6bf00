use taskrun_runner::ShellMode;
use taskrun_utils::error::ConfigError;
use taskrun_utils::logging::LogFormat;

use crate::model::Config;

impl Config {
    /// Validate configuration values
    ///
    /// Stops at the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(platform) = &self.runner.platform {
            platform
                .parse::<ShellMode>()
                .map_err(|value| invalid("platform", value))?;
        }

        if let Some(log_format) = &self.defaults.log_format {
            log_format
                .parse::<LogFormat>()
                .map_err(|value| invalid("log_format", value))?;
        }

        if let Some(target) = &self.defaults.target
            && target.trim().is_empty()
        {
            return Err(invalid("target", "target label must not be empty"));
        }

        if let Some(shell) = &self.runner.shell
            && shell.trim().is_empty()
        {
            return Err(invalid("shell", "shell program must not be empty"));
        }

        if self.runner.shell_flag.is_some() && self.runner.shell.is_none() {
            return Err(invalid("shell_flag", "shell_flag requires shell to be set"));
        }

        if let Some(path) = &self.store.path
            && path.trim().is_empty()
        {
            return Err(invalid("store_path", "store path must not be empty"));
        }

        Ok(())
    }
}

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigBuilder;

    fn key_of(err: ConfigError) -> String {
        match err {
            ConfigError::InvalidValue { key, .. } => key,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigBuilder::new().build().is_ok());
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let err = ConfigBuilder::new().platform("beos").build().unwrap_err();
        assert_eq!(key_of(err), "platform");
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let err = ConfigBuilder::new().log_format("xml").build().unwrap_err();
        assert_eq!(key_of(err), "log_format");
    }

    #[test]
    fn test_empty_shell_rejected() {
        let err = ConfigBuilder::new().shell("  ").build().unwrap_err();
        assert_eq!(key_of(err), "shell");
    }

    #[test]
    fn test_shell_flag_without_shell_rejected() {
        let err = ConfigBuilder::new().shell_flag("-lc").build().unwrap_err();
        assert_eq!(key_of(err), "shell_flag");
    }

    #[test]
    fn test_empty_store_path_rejected() {
        let err = ConfigBuilder::new().store_path("").build().unwrap_err();
        assert_eq!(key_of(err), "store_path");
    }

    #[test]
    fn test_empty_target_rejected() {
        let err = ConfigBuilder::new().target("").build().unwrap_err();
        assert_eq!(key_of(err), "target");
    }
}
