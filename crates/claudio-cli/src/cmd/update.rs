use super::{load_config, require_initialized, template_source};
use crate::output::{self, print_json};
use crate::ui::{self, Prompter};
use anyhow::Context;
use claudio_core::{
    reconcile::{
        self, check_for_updates, installed_version, ApplyReport, ClassifiedUpdate, ReportEntry,
        UpdateKind, UpdatePolicy, VersionCheck,
    },
    templates::Category,
    PACKAGED_VERSION,
};
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Subcommand)]
pub enum UpdateSubcommand {
    /// Report available updates without installing anything
    Check,
    /// Overwrite every installed template, backing up changed files
    Force,
}

pub fn run(
    root: &Path,
    subcmd: Option<UpdateSubcommand>,
    prompter: &Prompter,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        None => interactive(root, prompter, json),
        Some(UpdateSubcommand::Check) => check(root, json),
        Some(UpdateSubcommand::Force) => force(root, prompter, json),
    }
}

// ---------------------------------------------------------------------------
// Pending updates
// ---------------------------------------------------------------------------

#[derive(Default, Serialize)]
struct Pending<'a> {
    new_commands: Vec<&'a str>,
    updated_commands: Vec<&'a str>,
    new_guides: Vec<&'a str>,
    updated_guides: Vec<&'a str>,
}

impl<'a> Pending<'a> {
    fn from_updates(updates: &'a [ClassifiedUpdate]) -> Self {
        let names = |category, kind| -> Vec<&'a str> {
            updates
                .iter()
                .filter(|u| u.is(category, kind))
                .map(|u| u.template().display_name.as_str())
                .collect()
        };
        Self {
            new_commands: names(Category::Commands, UpdateKind::New),
            updated_commands: names(Category::Commands, UpdateKind::Updated),
            new_guides: names(Category::Guides, UpdateKind::New),
            updated_guides: names(Category::Guides, UpdateKind::Updated),
        }
    }

    fn total(&self) -> usize {
        self.new_commands.len()
            + self.updated_commands.len()
            + self.new_guides.len()
            + self.updated_guides.len()
    }

    fn has_updated(&self) -> bool {
        !self.updated_commands.is_empty() || !self.updated_guides.is_empty()
    }

    fn print(&self) {
        output::section("📋 Available Updates:");
        let groups = [
            ("✨ New Commands", &self.new_commands, "/"),
            ("🔄 Updated Commands", &self.updated_commands, "/"),
            ("📚 New Guides", &self.new_guides, ""),
            ("📝 Updated Guides", &self.updated_guides, ""),
        ];
        for (title, names, prefix) in groups {
            if names.is_empty() {
                continue;
            }
            let line = format!("\n{title} ({}):", names.len());
            if title.contains("New") {
                println!("{}", line.green());
            } else {
                println!("{}", line.yellow());
            }
            for name in names.iter() {
                println!("  - {prefix}{name}");
            }
        }
    }
}

fn print_versions(version: &VersionCheck) {
    output::section("📦 Version Information:");
    println!("  Installed: {}", version.installed_version);
    println!("  Packaged:  {}", version.packaged_version);
}

fn scan(root: &Path) -> anyhow::Result<(VersionCheck, Vec<ClassifiedUpdate>)> {
    let config = load_config(root)?;
    let source = template_source(root, &config);
    let version = check_for_updates(&installed_version(root), PACKAGED_VERSION);
    let updates = reconcile::diff(&source, root)
        .with_context(|| format!("failed to compare templates from {}", source.describe()))?;
    Ok((version, updates))
}

// ---------------------------------------------------------------------------
// update (interactive)
// ---------------------------------------------------------------------------

fn interactive(root: &Path, prompter: &Prompter, json: bool) -> anyhow::Result<()> {
    require_initialized(root)?;
    if !json {
        output::heading("🔄 CLAUDIO UPDATE");
        output::muted("Checking for available updates...");
    }

    let (version, updates) = scan(root)?;
    let pending = Pending::from_updates(&updates);
    if !json {
        print_versions(&version);
    }

    if pending.total() == 0 {
        if json {
            return print_json(&serde_json::json!({
                "version": version,
                "applied": false,
                "report": ApplyReport::default(),
            }));
        }
        println!("\n{}", "✅ Everything is up to date!".green());
        return Ok(());
    }

    if !json {
        pending.print();
        println!();
    }

    if !prompter.confirm("Do you want to proceed with the update?", true)? {
        if json {
            return print_json(&serde_json::json!({ "version": version, "applied": false }));
        }
        println!("\n{}", "⏭️  Update cancelled".yellow());
        return Ok(());
    }

    let selected = prompter.select(
        "What would you like to update?",
        &[
            ("New commands", true),
            ("Updated commands and guides (overwrites existing files)", false),
            ("New guides", true),
        ],
    )?;
    let overwrite = selected[1] && pending.has_updated();
    let backup = overwrite && prompter.confirm("Create backup of existing files before updating?", true)?;

    let policy = UpdatePolicy {
        install_new: selected[0],
        overwrite_updated: overwrite,
        backup_before_overwrite: backup,
        install_new_guides: selected[2],
    };
    let report = apply(root, &updates, &policy, json)?;

    if json {
        return print_json(&serde_json::json!({
            "version": version,
            "applied": true,
            "policy": policy,
            "report": report,
        }));
    }
    print_report(&report);
    Ok(())
}

fn apply(
    root: &Path,
    updates: &[ClassifiedUpdate],
    policy: &UpdatePolicy,
    json: bool,
) -> anyhow::Result<ApplyReport> {
    policy.validate()?;
    let spinner = ui::spinner("Updating templates...", json);
    let report = reconcile::apply_and_record(root, updates, policy, PACKAGED_VERSION)
        .context("failed to apply template updates")?;
    if report.failed.is_empty() {
        spinner.finish_with_message("Update completed!");
    } else {
        spinner.abandon_with_message(format!(
            "Update completed with {} failure(s)",
            report.failed.len()
        ));
    }
    Ok(report)
}

fn describe(entry: &ReportEntry) -> String {
    let noun = match entry.category {
        Category::Commands => format!("command /{}", entry.name),
        Category::Guides => format!("guide {}", entry.name),
    };
    match entry.kind {
        UpdateKind::New => format!("new {noun}"),
        UpdateKind::Updated | UpdateKind::Unchanged => noun,
    }
}

fn print_report(report: &ApplyReport) {
    output::section("📊 Update Results:");
    for entry in &report.succeeded {
        let verb = if entry.kind == UpdateKind::New {
            "Added"
        } else {
            "Updated"
        };
        output::ok(&format!("{verb} {}", describe(entry)));
    }
    for entry in report
        .skipped
        .iter()
        .filter(|e| e.kind != UpdateKind::Unchanged)
    {
        println!("{}", format!("⏭️  Skipped {}", describe(entry)).yellow());
    }
    for failed in &report.failed {
        output::fail(&format!("Failed {}: {}", describe(&failed.entry), failed.reason));
    }
    for backup in &report.backups {
        output::muted(&format!("  backup: {}", backup.display()));
    }

    let unchanged = report
        .skipped
        .iter()
        .filter(|e| e.kind == UpdateKind::Unchanged)
        .count();
    if unchanged > 0 {
        output::muted(&format!("{unchanged} file(s) already up to date"));
    }
    if !report.succeeded.is_empty() {
        println!(
            "\n{}",
            format!("✨ Successfully updated {} items!", report.succeeded.len()).green()
        );
    }
}

// ---------------------------------------------------------------------------
// update check
// ---------------------------------------------------------------------------

fn check(root: &Path, json: bool) -> anyhow::Result<()> {
    let (version, updates) = scan(root)?;
    let pending = Pending::from_updates(&updates);

    if json {
        return print_json(&serde_json::json!({
            "version": version,
            "pending": pending.total(),
            "updates": pending,
        }));
    }

    output::heading("🔍 UPDATE CHECK");
    print_versions(&version);
    if pending.total() == 0 {
        println!("\n{}", "✅ Everything is up to date!".green());
    } else {
        println!(
            "\n{}",
            format!("📋 {} updates available", pending.total()).yellow()
        );
        output::muted("\nRun \"claudio update\" to install updates");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// update force
// ---------------------------------------------------------------------------

fn force(root: &Path, prompter: &Prompter, json: bool) -> anyhow::Result<()> {
    require_initialized(root)?;
    if !json {
        println!("{}", "⚠️  FORCE UPDATE".yellow().bold());
        println!("{}", "This will overwrite all existing templates!\n".red());
    }

    // --yes is taken as the confirmation here; the prompt default is "no".
    let confirmed = prompter.assumes_yes()
        || (prompter.confirm("Are you sure you want to force update all templates?", false)?
            && prompter.type_to_confirm("Type \"UPDATE\" to confirm:", "UPDATE")?);
    if !confirmed {
        if json {
            return print_json(&serde_json::json!({ "applied": false }));
        }
        println!("\n{}", "⏭️  Force update cancelled".yellow());
        return Ok(());
    }

    let (version, updates) = scan(root)?;
    let policy = UpdatePolicy::force();
    let report = apply(root, &updates, &policy, json)?;
    if json {
        return print_json(&serde_json::json!({
            "version": version,
            "applied": true,
            "policy": policy,
            "report": report,
        }));
    }
    print_report(&report);
    Ok(())
}
