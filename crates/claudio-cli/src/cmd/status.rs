use super::load_config;
use crate::output::{self, print_json};
use claudio_core::{status, tools};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

const BANNER: &str = r#"
   ██████╗██╗      █████╗ ██╗   ██╗██████╗ ██╗ ██████╗
  ██╔════╝██║     ██╔══██╗██║   ██║██╔══██╗██║██╔═══██╗
  ██║     ██║     ███████║██║   ██║██║  ██║██║██║   ██║
  ██║     ██║     ██╔══██║██║   ██║██║  ██║██║██║   ██║
  ╚██████╗███████╗██║  ██║╚██████╔╝██████╔╝██║╚██████╔╝
   ╚═════╝╚══════╝╚═╝  ╚═╝ ╚═════╝ ╚═════╝ ╚═╝ ╚═════╝
"#;

#[derive(Serialize)]
struct StatusOutput {
    root: String,
    setup: bool,
    assistant: String,
    assistant_available: bool,
    active_epic: Option<String>,
    recent_activity: Vec<String>,
}

/// `claudio` with no subcommand: banner, then status.
pub fn welcome(root: &Path, json: bool) -> anyhow::Result<()> {
    if !json {
        println!("{}", BANNER.cyan());
        output::muted("    🤖 AI-Powered Development Assistant\n");
    }
    run(root, json)
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let setup = status::is_project_setup(root);
    let assistant_ok = tools::assistant_available(&config.assistant);
    let (active_epic, recent_activity) = if setup {
        (status::active_epic(root), status::recent_activity(root, 3))
    } else {
        (None, Vec::new())
    };

    if json {
        return print_json(&StatusOutput {
            root: root.display().to_string(),
            setup,
            assistant: config.assistant,
            assistant_available: assistant_ok,
            active_epic,
            recent_activity,
        });
    }

    output::heading("📊 PROJECT STATUS\n");
    if setup {
        output::ok("Project setup complete");
    } else {
        output::fail("Project not set up - run: claudio init");
    }
    if assistant_ok {
        output::ok(&format!("Assistant available ({})", config.assistant));
    } else {
        output::warn(&format!(
            "Assistant '{}' not found - {}",
            config.assistant,
            tools::ASSISTANT_INSTALL_HINT
        ));
    }

    if let Some(epic) = &active_epic {
        println!("{}", format!("🎯 Active Epic: {epic}").cyan());
    }
    if !recent_activity.is_empty() {
        output::muted("📝 Recent Activity:");
        for line in &recent_activity {
            output::muted(&format!("  {line}"));
        }
    }

    println!("\n{}", "🚀 NEXT STEPS:".blue());
    if !setup {
        output::steps(&[
            ("claudio init", "Set up the project"),
            ("claude", "Open the assistant"),
            ("/project:radar:analyze", "Run analysis"),
        ]);
    } else if !assistant_ok {
        output::steps(&[
            ("install the assistant", "https://claude.ai/download"),
            ("claude", "Open the assistant"),
            ("/project:radar:analyze", "Run analysis"),
        ]);
    } else {
        output::steps(&[
            ("claude", "Open the assistant"),
            ("/project:radar:analyze", "Run analysis"),
            ("/project:cider:generate", "Create issues"),
            ("/project:cider:work", "Start development"),
        ]);
    }
    Ok(())
}

/// `claudio help-commands`
pub fn help_commands() {
    output::heading("🎯 AVAILABLE COMMANDS\n");

    println!("{}", "📋 Setup & Status:".cyan());
    output::listing(&[
        ("claudio init", "Initialize project"),
        ("claudio quick", "Minimal setup without prompts"),
        ("claudio status", "Show project status"),
        ("claudio check", "Check configuration"),
        ("claudio update", "Update installed commands and guides"),
        ("claudio config show", "Show effective configuration"),
    ]);

    output::section("🔍 Quick Actions:");
    output::listing(&[
        ("claudio open", "Open the assistant"),
        ("claudio analyze", "How to run analysis"),
        ("claudio radar <phase> [path]", "Run an analysis phase script"),
        ("claudio cider generate <epic> <desc>", "Generate an atomic issue"),
    ]);

    output::section("⚡ Assistant Commands (use inside the assistant):");
    output::listing(&[
        ("/project:radar:analyze", "Complete project analysis"),
        ("/project:radar:quick", "Quick project overview"),
        ("/project:cider:generate", "Generate atomic issues"),
        ("/project:cider:work", "Work on specific issue"),
        ("/project:cider:status", "Project status"),
        ("/project:cider:list-epics", "List available epics"),
    ]);

    println!("\n{}", "💡 Workflow:".yellow());
    output::steps(&[
        ("claudio init", "One-time setup"),
        ("claude", "Open the assistant"),
        ("/project:radar:analyze", "Understand project"),
        ("/project:cider:generate", "Create work items"),
        ("/project:cider:work", "Start coding"),
    ]);
}
