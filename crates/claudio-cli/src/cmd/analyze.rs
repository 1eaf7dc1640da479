use crate::output;
use claudio_core::{status, ClaudioError};
use colored::Colorize;
use std::path::Path;

/// `claudio analyze`: analysis runs inside the assistant; point the user
/// at the slash commands.
pub fn run(root: &Path) -> anyhow::Result<()> {
    if !status::is_project_setup(root) {
        return Err(ClaudioError::NotInitialized.into());
    }

    println!("{}", "🔍 Analysis runs inside the assistant".cyan());
    println!("\n📋 To analyze your project:");
    for (i, (what, how)) in [
        ("Open the assistant", "claude"),
        ("Run quick analysis", "/project:radar:quick"),
        ("Run full analysis", "/project:radar:analyze"),
    ]
    .iter()
    .enumerate()
    {
        println!("  {}. {what}: {}", i + 1, how.bold().green());
    }
    println!();
    output::hint("For script-driven analysis outside the assistant: claudio radar analyze");
    Ok(())
}
