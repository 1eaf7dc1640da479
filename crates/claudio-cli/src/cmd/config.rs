use super::{load_config, template_source};
use crate::output::{print_json, print_table};
use anyhow::Context;
use claudio_core::{
    config::{Config, WarnLevel},
    paths,
};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration, environment overrides included
    Show {
        /// Print the configuration as YAML, as it would be saved
        #[arg(long)]
        yaml: bool,
    },

    /// Write .claude/config.yaml with the default settings
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show { yaml } => show(root, yaml, json),
        ConfigSubcommand::Init { force } => init(root, force, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path, force: bool, json: bool) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let written = force || !path.exists();
    if written {
        Config::default()
            .save(root)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if json {
        return print_json(&serde_json::json!({
            "path": path,
            "written": written,
        }));
    }
    if written {
        println!("Wrote {}", path.display());
    } else {
        println!(
            "{} already exists; pass --force to replace it",
            path.display()
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Resolved {
    scripts_dir: PathBuf,
    analysis_dir: PathBuf,
    template_source: String,
}

fn show(root: &Path, yaml: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let resolved = Resolved {
        scripts_dir: config.resolve_scripts_dir(root),
        analysis_dir: config.resolve_analysis_dir(root),
        template_source: template_source(root, &config).describe(),
    };

    if json {
        return print_json(&serde_json::json!({
            "config": config,
            "resolved": resolved,
        }));
    }
    if yaml {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    print_table(&["KEY", "VALUE"], rows(&config, &resolved));
    Ok(())
}

fn rows(config: &Config, resolved: &Resolved) -> Vec<Vec<String>> {
    let optional = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    vec![
        vec!["assistant".into(), config.assistant.clone()],
        vec!["scripts_dir".into(), optional(&config.scripts_dir)],
        vec![
            "analysis_dir".into(),
            config.analysis_dir.display().to_string(),
        ],
        vec![
            "radar_timeout_secs".into(),
            config.radar_timeout_secs.to_string(),
        ],
        vec!["templates_dir".into(), optional(&config.templates_dir)],
        vec![
            "(resolved) scripts".into(),
            resolved.scripts_dir.display().to_string(),
        ],
        vec![
            "(resolved) analysis".into(),
            resolved.analysis_dir.display().to_string(),
        ],
        vec![
            "(resolved) templates".into(),
            resolved.template_source.clone(),
        ],
    ]
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let warnings = config.validate(root);

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
