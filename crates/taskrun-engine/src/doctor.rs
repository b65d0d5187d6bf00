//! Doctor command for environment health checks
//!
//! Preflight checks for the configured shell, the task store and the
//! configuration itself. No task is executed.

pub use taskrun_utils::types::{CheckStatus, DoctorCheck, DoctorOutput};

use std::fs;

use camino::Utf8Path;
use chrono::Utc;
use tempfile::NamedTempFile;

use taskrun_config::Config;
use taskrun_store::{JsonFileTaskStore, TaskStore};

/// Doctor command implementation
pub struct DoctorCommand {
    config: Config,
}

impl DoctorCommand {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks. `ok` is false when any check failed.
    #[must_use]
    pub fn run(&self) -> DoctorOutput {
        let mut checks = vec![
            self.check_config(),
            self.check_shell(),
            self.check_store_readable(),
            self.check_store_writable(),
        ];

        // Sort checks by name for stable output
        checks.sort_by(|a, b| a.name.cmp(&b.name));

        let ok = checks.iter().all(|c| c.status != CheckStatus::Fail);

        DoctorOutput {
            schema_version: "1".to_string(),
            emitted_at: Utc::now(),
            ok,
            checks,
        }
    }

    fn check_config(&self) -> DoctorCheck {
        if let Err(err) = self.config.validate() {
            return check("config", CheckStatus::Fail, err.to_string());
        }
        let details = match &self.config.config_file {
            Some(path) => format!("Loaded {path}"),
            None => "No config file found; using built-in defaults".to_string(),
        };
        check("config", CheckStatus::Pass, details)
    }

    fn check_shell(&self) -> DoctorCheck {
        let shell = self.config.shell();
        match shell.locate() {
            Ok(path) => check(
                "shell",
                CheckStatus::Pass,
                format!("{shell} resolves to {}", path.display()),
            ),
            Err(err) => check("shell", CheckStatus::Fail, err.to_string()),
        }
    }

    fn check_store_readable(&self) -> DoctorCheck {
        let store = JsonFileTaskStore::open(self.config.store_path());
        if !store.exists() {
            return check(
                "store_read",
                CheckStatus::Warn,
                format!("{} does not exist yet; it is created on first save", store.path()),
            );
        }
        match store.find_all() {
            Ok(tasks) => check(
                "store_read",
                CheckStatus::Pass,
                format!("{} task(s) in {}", tasks.len(), store.path()),
            ),
            Err(err) => check("store_read", CheckStatus::Fail, err.to_string()),
        }
    }

    fn check_store_writable(&self) -> DoctorCheck {
        let store_path = self.config.store_path();
        let Some(dir) = store_path.parent().filter(|p| !p.as_str().is_empty()) else {
            return Self::probe_write(Utf8Path::new("."));
        };

        // Walk up to the nearest directory that exists; missing ones get created on save.
        let mut existing = dir;
        while !existing.exists() {
            match existing.parent().filter(|p| !p.as_str().is_empty()) {
                Some(parent) => existing = parent,
                None => return Self::probe_write(Utf8Path::new(".")),
            }
        }
        Self::probe_write(existing)
    }

    fn probe_write(dir: &Utf8Path) -> DoctorCheck {
        match fs::metadata(dir) {
            Ok(meta) if !meta.is_dir() => {
                return check(
                    "store_write",
                    CheckStatus::Fail,
                    format!("{dir} is not a directory"),
                );
            }
            Err(err) => {
                return check("store_write", CheckStatus::Fail, format!("{dir}: {err}"));
            }
            Ok(_) => {}
        }
        match NamedTempFile::new_in(dir) {
            Ok(_) => check(
                "store_write",
                CheckStatus::Pass,
                format!("{dir} is writable"),
            ),
            Err(err) => check(
                "store_write",
                CheckStatus::Fail,
                format!("Cannot write in {dir}: {err}"),
            ),
        }
    }
}

fn check(name: &str, status: CheckStatus, details: String) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        status,
        details,
    }
}
