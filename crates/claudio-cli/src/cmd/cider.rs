use super::{check_script_prerequisites, load_config, print_script_stderr, run_with_spinner};
use crate::output::{self, print_json};
use anyhow::Context;
use claudio_core::process::{ScriptRun, ISSUE_GENERATOR_SCRIPT, ISSUE_WORKER_SCRIPT};
use clap::Subcommand;
use colored::Colorize;
use std::path::Path;

#[derive(Subcommand)]
pub enum CiderSubcommand {
    /// Generate atomic issues for an epic
    Generate { epic: String, description: String },
    /// Work on a generated issue
    Work { issue: String, scope: String },
    /// List available epics
    ListEpics,
    /// Run the generator's demo
    Demo,
    /// Analyze the codebase for a query
    Analyze { query: String },
}

impl CiderSubcommand {
    /// Script to invoke and the arguments to pass it.
    fn invocation(&self) -> (&'static str, Vec<&str>) {
        match self {
            Self::Generate { epic, description } => (
                ISSUE_GENERATOR_SCRIPT,
                vec!["generate", epic.as_str(), description.as_str()],
            ),
            Self::Work { issue, scope } => {
                (ISSUE_WORKER_SCRIPT, vec![issue.as_str(), scope.as_str()])
            }
            Self::ListEpics => (ISSUE_GENERATOR_SCRIPT, vec!["list-epics"]),
            Self::Demo => (ISSUE_GENERATOR_SCRIPT, vec!["demo"]),
            Self::Analyze { query } => (ISSUE_GENERATOR_SCRIPT, vec!["analyze", query.as_str()]),
        }
    }

    fn print_banner(&self) {
        match self {
            Self::Generate { .. } => {
                println!("{}", "🎯 C.I.D.E.R. ISSUE GENERATOR".green().bold());
                output::muted("Contextualize → Iterate → Document → Execute → Reflect\n");
            }
            Self::Work { issue, scope } => {
                println!("{}", "⚡ C.I.D.E.R. WORKER".blue().bold());
                output::muted(&format!("Working on issue #{issue} - {scope}\n"));
            }
            Self::ListEpics => println!("{}", "📋 Available Epics".cyan().bold()),
            Self::Demo => println!("{}", "🎮 C.I.D.E.R. DEMO".magenta().bold()),
            Self::Analyze { .. } => println!("{}", "🔍 C.I.D.E.R. ANALYZER".yellow().bold()),
        }
    }
}

pub fn run(root: &Path, subcmd: CiderSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let (script_name, args) = subcmd.invocation();
    let script = config.resolve_scripts_dir(root).join(script_name);

    if !json {
        subcmd.print_banner();
    }
    check_script_prerequisites(root, &config, &script, json)?;

    let run = args
        .iter()
        .fold(ScriptRun::new(script, root), |run, arg| run.arg(*arg));
    match run_with_spinner(&run, "Running C.I.D.E.R. command", json)? {
        Ok(out) => {
            if json {
                return print_json(&serde_json::json!({
                    "script": script_name,
                    "args": args,
                    "elapsed_secs": out.elapsed.as_secs(),
                    "stdout": out.stdout,
                }));
            }
            println!("{}", out.stdout);
            Ok(())
        }
        Err(err) => {
            if !json {
                print_script_stderr(&err);
            }
            Err(err).context("C.I.D.E.R. command failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_goes_to_the_worker_script() {
        let sub = CiderSubcommand::Work {
            issue: "42".to_string(),
            scope: "api".to_string(),
        };
        assert_eq!(sub.invocation(), (ISSUE_WORKER_SCRIPT, vec!["42", "api"]));
    }

    #[test]
    fn generator_verbs_lead_the_arguments() {
        let sub = CiderSubcommand::Generate {
            epic: "AUTH".to_string(),
            description: "login flow".to_string(),
        };
        assert_eq!(
            sub.invocation(),
            (ISSUE_GENERATOR_SCRIPT, vec!["generate", "AUTH", "login flow"])
        );
        assert_eq!(
            CiderSubcommand::ListEpics.invocation(),
            (ISSUE_GENERATOR_SCRIPT, vec!["list-epics"])
        );
    }
}
