mod cmd;
mod output;
mod root;
mod ui;

use clap::{Parser, Subcommand};
use claudio_core::{tools, ClaudioError};
use cmd::{
    cider::CiderSubcommand, config::ConfigSubcommand, radar::RadarSubcommand,
    update::UpdateSubcommand,
};
use colored::Colorize;
use std::path::PathBuf;
use ui::Prompter;

#[derive(Parser)]
#[command(
    name = "claudio",
    about = "Scaffold AI-assisted development state and keep its templates current",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, global = true, env = "CLAUDIO_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Never prompt; accept every default
    #[arg(long, global = true, short = 'y')]
    yes: bool,

    /// Verbose logging
    #[arg(long, global = true, env = "CLAUDIO_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up .claude/ interactively: state files, slash commands, guides
    Init,

    /// Minimal non-interactive setup
    Quick,

    /// Show project setup state, active epic and recent activity
    Status,

    /// Score the project configuration
    Check,

    /// Launch the assistant in this project
    Open,

    /// Show how to analyze the project from inside the assistant
    Analyze,

    /// List every command and slash command
    HelpCommands,

    /// Install new and changed templates
    Update {
        #[command(subcommand)]
        subcommand: Option<UpdateSubcommand>,
    },

    /// Run repository analysis scripts
    Radar {
        #[command(subcommand)]
        subcommand: RadarSubcommand,
    },

    /// Generate and work atomic issues
    Cider {
        #[command(subcommand)]
        subcommand: CiderSubcommand,
    },

    /// Inspect and validate .claude/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");
    let prompter = Prompter::new(cli.yes);

    let result = match cli.command {
        None => cmd::status::welcome(&root, cli.json),
        Some(Commands::Init) => cmd::init::run(&root, &prompter, cli.json),
        Some(Commands::Quick) => cmd::init::run_quick(&root, cli.json),
        Some(Commands::Status) => cmd::status::run(&root, cli.json),
        Some(Commands::Check) => cmd::check::run(&root, cli.json),
        Some(Commands::Open) => cmd::open::run(&root),
        Some(Commands::Analyze) => cmd::analyze::run(&root),
        Some(Commands::HelpCommands) => {
            cmd::status::help_commands();
            Ok(())
        }
        Some(Commands::Update { subcommand }) => {
            cmd::update::run(&root, subcommand, &prompter, cli.json)
        }
        Some(Commands::Radar { subcommand }) => cmd::radar::run(&root, subcommand, cli.json),
        Some(Commands::Cider { subcommand }) => cmd::cider::run(&root, subcommand, cli.json),
        Some(Commands::Config { subcommand }) => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("{} {e:#}", "error:".red().bold());
        if let Some(hint) = e.downcast_ref::<ClaudioError>().and_then(tools::hint_for) {
            eprintln!("{} {hint}", "hint:".yellow());
        }
        std::process::exit(1);
    }
}
