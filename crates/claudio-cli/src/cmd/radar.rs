use super::{check_script_prerequisites, load_config, print_script_stderr, run_with_spinner};
use crate::output::{self, print_json};
use anyhow::Context;
use claudio_core::{
    config::Config,
    process::{self, ScriptOutput, ScriptRun, RADAR_SCRIPT},
    ProcessError,
};
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Subcommand)]
pub enum RadarSubcommand {
    /// Full analysis, all five phases
    Analyze { path: Option<String> },
    /// Phase 1: recognize structure and purpose
    Discover { path: Option<String> },
    /// Phase 2: analyze architecture and patterns
    Examine { path: Option<String> },
    /// Phase 3: generate documentation
    Document { path: Option<String> },
    /// Phase 4: map components and dependencies
    Guide { path: Option<String> },
    /// Phase 5: executive summary and recommendations
    Report { path: Option<String> },
    /// Discover then report on the current directory
    Quick,
}

impl RadarSubcommand {
    fn banner(&self) -> (String, Option<&'static str>) {
        match self {
            Self::Analyze { .. } => (
                "🔍 R.A.D.A.R. REPOSITORY ANALYZER".blue().bold().to_string(),
                Some("Recognize → Analyze → Document → Architect → Report"),
            ),
            Self::Discover { .. } => (phase("🔍", 1, "RECOGNIZE"), None),
            Self::Examine { .. } => (phase("🧐", 2, "ANALYZE"), None),
            Self::Document { .. } => (phase("📝", 3, "DOCUMENT"), None),
            Self::Guide { .. } => (phase("🏗️", 4, "ARCHITECT"), None),
            Self::Report { .. } => (phase("📊", 5, "REPORT"), None),
            Self::Quick => (
                "⚡ R.A.D.A.R. QUICK ANALYSIS".yellow().bold().to_string(),
                None,
            ),
        }
    }

    /// Script verbs to run, in order, with their target path.
    fn steps(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Analyze { path } => vec![("analyze", at(path))],
            Self::Discover { path } => vec![("discover", at(path))],
            Self::Examine { path } => vec![("examine", at(path))],
            Self::Document { path } => vec![("document", at(path))],
            Self::Guide { path } => vec![("guide", at(path))],
            Self::Report { path } => vec![("report", at(path))],
            Self::Quick => vec![("discover", "."), ("report", ".")],
        }
    }
}

fn at(path: &Option<String>) -> &str {
    path.as_deref().unwrap_or(".")
}

fn phase(icon: &str, n: u8, name: &str) -> String {
    format!("{icon} R.A.D.A.R. Phase {n}: {name}")
        .blue()
        .bold()
        .to_string()
}

#[derive(Serialize)]
struct StepOutput<'a> {
    command: &'a str,
    path: &'a str,
    elapsed_secs: u64,
    stdout: String,
}

#[derive(Serialize)]
struct RadarOutput<'a> {
    steps: Vec<StepOutput<'a>>,
    reports: Vec<PathBuf>,
}

pub fn run(root: &Path, subcmd: RadarSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let script = config.resolve_scripts_dir(root).join(RADAR_SCRIPT);

    if !json {
        let (title, subtitle) = subcmd.banner();
        println!("{title}");
        if let Some(subtitle) = subtitle {
            output::muted(&format!("{subtitle}\n"));
        }
    }
    check_script_prerequisites(root, &config, &script, json)?;

    let steps = subcmd.steps();
    let mut outputs = Vec::with_capacity(steps.len());
    for (verb, path) in steps {
        let out = run_step(root, &config, &script, verb, path, json)?;
        if !json {
            println!("{}", out.stdout);
        }
        outputs.push(StepOutput {
            command: verb,
            path,
            elapsed_secs: out.elapsed.as_secs(),
            stdout: out.stdout,
        });
    }

    let reports = process::list_reports(&config.resolve_analysis_dir(root));
    if json {
        return print_json(&RadarOutput {
            steps: outputs,
            reports,
        });
    }
    if !reports.is_empty() {
        output::section("📄 Generated files:");
        for report in &reports {
            let shown = report.strip_prefix(root).unwrap_or(report);
            println!("{}", format!("  ✅ {}", shown.display()).green());
        }
    }
    Ok(())
}

fn run_step(
    root: &Path,
    config: &Config,
    script: &Path,
    verb: &str,
    path: &str,
    json: bool,
) -> anyhow::Result<ScriptOutput> {
    let run = ScriptRun::new(script.to_path_buf(), root)
        .arg(verb)
        .arg(path)
        .timeout(Some(Duration::from_secs(config.radar_timeout_secs)));
    let label = format!("Running R.A.D.A.R. {verb}");

    match run_with_spinner(&run, &label, json)? {
        Ok(out) => Ok(out),
        Err(err) => {
            if !json {
                match &err {
                    ProcessError::TimedOut { .. } => output::hint(
                        "try running individual phases: claudio radar discover, claudio radar examine, ...",
                    ),
                    ProcessError::NotFound { program } => {
                        output::hint(&format!("'{program}' is required to run analysis scripts"))
                    }
                    ProcessError::Failed { .. } | ProcessError::Spawn { .. } => {}
                }
                print_script_stderr(&err);
                output::muted(&format!(
                    "\n🐛 For debugging, run with: claudio --debug radar {verb}"
                ));
            }
            Err(err).with_context(|| format!("R.A.D.A.R. {verb} failed"))
        }
    }
}
