use super::{load_config, template_source};
use crate::output::{self, print_json};
use crate::ui::{self, Prompter};
use anyhow::Context;
use claudio_core::{
    reconcile::{self, ApplyReport, UpdatePolicy},
    project::TechStack,
    scaffold::{self, FileOutcome, ScaffoldReport},
    tools, PACKAGED_VERSION,
};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

const INIT_COMMIT_MESSAGE: &str = "Initial commit with Claude setup";
const QUICK_COMMIT_MESSAGE: &str = "Initial commit with Claude structure";

#[derive(Debug, Default, Serialize)]
struct SetupSummary {
    gitignore_entries_added: Option<usize>,
    scaffold: Option<ScaffoldReport>,
    templates: Option<ApplyReport>,
    git: GitOutcome,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "snake_case")]
enum GitOutcome {
    #[default]
    AlreadyPresent,
    Initialized,
    Skipped,
}

/// `claudio init`: interactive setup.
pub fn run(root: &Path, prompter: &Prompter, json: bool) -> anyhow::Result<()> {
    if !json {
        output::heading("🚀 CLAUDIO SETUP");
        output::muted(&format!(
            "Setting up Claude development tools in {}\n",
            root.display()
        ));
    }

    let create_structure = prompter.confirm("Create .claude/ development structure?", true)?;
    let setup_gitignore = prompter.confirm("Add Claude development files to .gitignore?", true)?;

    let mut summary = SetupSummary::default();
    if setup_gitignore {
        summary.gitignore_entries_added = Some(update_gitignore(root, json)?);
    }
    if create_structure {
        let (scaffold, templates) = install(root, json)?;
        if !json && (scaffold.has_failures() || !templates.failed.is_empty()) {
            output::hint(".claude/ structure setup had failures, continuing...");
        }
        summary.scaffold = Some(scaffold);
        summary.templates = Some(templates);
    }
    summary.git = init_git(root, INIT_COMMIT_MESSAGE, json);

    if json {
        return print_json(&summary);
    }

    println!("\n{}", "🎉 PROJECT SETUP COMPLETE!".green().bold());
    output::section("📁 Created structure:");
    for (dir, what) in [
        (".claude/current/", "Project state tracking"),
        (".claude/epics/", "Epic management"),
        (".claude/commands/", "Native slash commands"),
        (".claude/sessions/", "Session history"),
        (".claude/guides/", "Development methodology"),
    ] {
        println!("  ✅ {dir} - {what}");
    }
    output::section("🚀 Next steps:");
    output::steps(&[
        ("claude", "Open the assistant"),
        ("/project:setup", "Initialize the project"),
        ("/project:radar:analyze", "Run analysis"),
        ("/project:cider:generate EPIC-DOCS \"improve README\"", "Generate issues"),
    ]);
    Ok(())
}

/// `claudio quick`: minimal setup without prompts.
pub fn run_quick(root: &Path, json: bool) -> anyhow::Result<()> {
    if !json {
        output::heading("⚡ CLAUDIO QUICK START");
    }
    let summary = SetupSummary {
        gitignore_entries_added: Some(update_gitignore(root, json)?),
        ..SetupSummary::default()
    };
    let (scaffold, templates) = install(root, json)?;
    let summary = SetupSummary {
        scaffold: Some(scaffold),
        templates: Some(templates),
        git: init_git(root, QUICK_COMMIT_MESSAGE, json),
        ..summary
    };

    if json {
        return print_json(&summary);
    }
    println!("\n{}", "⚡ Ready to go! Try:".green());
    output::listing(&[
        ("claude", "Open the assistant"),
        ("/project:radar:quick", "Quick analysis"),
        ("/project:radar:analyze", "Full analysis"),
        ("/project:cider:generate", "Generate issues"),
    ]);
    Ok(())
}

fn update_gitignore(root: &Path, json: bool) -> anyhow::Result<usize> {
    let existed = root.join(".gitignore").exists();
    let added = scaffold::ensure_gitignore(root).context("failed to update .gitignore")?;
    if !json {
        match (existed, added) {
            (_, 0) => output::muted("  .gitignore already configured"),
            (true, _) => output::ok("Added Claude entries to .gitignore"),
            (false, _) => output::ok("Created .gitignore with Claude entries"),
        }
    }
    Ok(added)
}

/// Scaffold `.claude/`, install commands and guides, and record the
/// manifest. Shared with `claudio quick`.
fn install(root: &Path, json: bool) -> anyhow::Result<(ScaffoldReport, ApplyReport)> {
    let config = load_config(root)?;
    let spinner = ui::spinner("Creating .claude/ structure...", json);

    let today = chrono::Local::now().date_naive();
    let tech = TechStack::detect(root);
    let scaffold = scaffold::scaffold(root, &tech, today);

    let source = template_source(root, &config);
    let templates =
        reconcile::reconcile(&source, root, &UpdatePolicy::scaffold(), PACKAGED_VERSION)
            .with_context(|| format!("failed to install templates from {}", source.describe()))?;

    let failures = scaffold.failures().count() + templates.failed.len();
    if failures == 0 {
        spinner.finish_with_message(".claude/ structure created ✅");
    } else {
        spinner.abandon_with_message(format!(
            ".claude/ structure created with {failures} failure(s)"
        ));
    }

    if !json {
        for entry in &scaffold.entries {
            match &entry.outcome {
                FileOutcome::Created => println!("  created: {}", entry.path),
                FileOutcome::Refreshed => println!("  updated: {}", entry.path),
                FileOutcome::Exists => {}
                FileOutcome::Failed(reason) => {
                    output::fail(&format!("{}: {reason}", entry.path))
                }
            }
        }
        for entry in &templates.succeeded {
            println!("  installed: .claude/{}", entry.path);
        }
        for failed in &templates.failed {
            output::fail(&format!(".claude/{}: {}", failed.entry.path, failed.reason));
        }
        let none_found = templates.succeeded.is_empty()
            && templates.failed.is_empty()
            && templates.skipped.is_empty();
        if none_found {
            output::warn(&format!(
                "No templates found in {}, skipping slash commands",
                source.describe()
            ));
        }
    }
    Ok((scaffold, templates))
}

/// `git init` + first commit when the root has no `.git`. Failure is only
/// a warning.
fn init_git(root: &Path, message: &str, json: bool) -> GitOutcome {
    if tools::has_git_dir(root) {
        return GitOutcome::AlreadyPresent;
    }
    let spinner = ui::spinner("Initializing Git repository...", json);
    match tools::init_and_commit(root, message) {
        Ok(()) => {
            spinner.finish_with_message("Git repository initialized ✅");
            GitOutcome::Initialized
        }
        Err(e) => {
            tracing::warn!(error = %e, "git initialization failed");
            spinner.abandon_with_message("Git initialization skipped");
            GitOutcome::Skipped
        }
    }
}
