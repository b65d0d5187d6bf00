use std::collections::BTreeMap;

use taskrun_utils::types::ConfigSource;

use crate::model::Config;

fn source_label(source: Option<&ConfigSource>) -> String {
    source.copied().unwrap_or(ConfigSource::Default).to_string()
}

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    ///
    /// Unset optional keys (`shell`, `shell_flag`) are omitted.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: Option<String>| {
            if let Some(val) = value {
                let source = source_label(self.source_attribution.get(key));
                config.insert(key.to_string(), (val, source));
            }
        };

        add_config("verbose", Some(self.verbose().to_string()));
        add_config("log_format", Some(self.log_format().to_string()));
        add_config("target", Some(self.target().to_string()));
        add_config("store_path", Some(self.store_path().to_string()));
        add_config("platform", Some(self.shell_mode().to_string()));
        add_config("shell", self.runner.shell.clone());
        add_config("shell_flag", self.runner.shell_flag.clone());

        config
    }
}
