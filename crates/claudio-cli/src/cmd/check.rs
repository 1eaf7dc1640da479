use super::load_config;
use crate::output::{self, print_json};
use claudio_core::status;
use colored::Colorize;
use std::path::Path;

/// `claudio check`: configuration checklist with a score. Never fails on a
/// low score; the score is the result.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let report = status::run_checks(root, &config.assistant);

    if json {
        return print_json(&report);
    }

    output::heading("🔍 CONFIGURATION CHECK");
    for check in &report.checks {
        if check.passed {
            output::ok(check.name);
        } else {
            output::fail(check.name);
        }
    }
    println!(
        "\n{}",
        format!("📊 Score: {}/{}", report.passed, report.total).cyan()
    );

    if report.all_passed() {
        println!("\n{}", "🎉 All checks passed! Ready to use Claude tools.".green());
    } else {
        println!();
        output::hint("Run: claudio init");
    }
    Ok(())
}
