//! Doctor command implementation
//!
//! Handles `taskrun doctor` command for environment health checks.

use anyhow::Result;

use taskrun_config::Config;
use taskrun_engine::DoctorCommand;
use taskrun_utils::exit_codes::ExitCode;
use taskrun_utils::types::{CheckStatus, DoctorOutput};

use super::json_emit::emit_doctor_json;

/// Execute the doctor command for environment health checks.
///
/// Returns `ExitCode::INTERNAL` when any check failed; warnings alone pass.
pub fn execute_doctor_command(json: bool, config: &Config) -> Result<ExitCode> {
    let output = DoctorCommand::new(config.clone()).run();

    if json {
        println!("{}", emit_doctor_json(&output)?);
    } else {
        print_report(&output, config);
    }

    Ok(if output.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::INTERNAL
    })
}

fn print_report(output: &DoctorOutput, config: &Config) {
    println!("taskrun doctor");
    for check in &output.checks {
        let marker = match check.status {
            CheckStatus::Pass => "✓",
            CheckStatus::Warn => "!",
            CheckStatus::Fail => "✗",
        };
        println!("  {marker} {:<12} {}", check.name, check.details);
    }

    println!();
    println!("Effective configuration:");
    for (key, (value, source)) in config.effective_config() {
        println!("  {key:<12} = {value} ({source})");
    }

    if !output.ok {
        println!();
        println!("Some checks failed. Please address the issues above before running tasks.");
    }
}
