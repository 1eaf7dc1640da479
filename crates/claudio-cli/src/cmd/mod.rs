pub mod analyze;
pub mod check;
pub mod cider;
pub mod config;
pub mod init;
pub mod open;
pub mod radar;
pub mod status;
pub mod update;

use anyhow::Context;
use claudio_core::{
    config::Config,
    paths,
    process::{ScriptOutput, ScriptRun},
    templates::TemplateSource,
    ClaudioError, ProcessError,
};
use colored::Colorize;
use std::future::Future;
use std::path::Path;

/// Project config with `CLAUDIO_*` environment overrides applied.
pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    let config = Config::load(root).context("failed to load .claude/config.yaml")?;
    Ok(config.with_env_overrides())
}

/// The configured on-disk template tree, else the embedded one.
pub fn template_source(root: &Path, config: &Config) -> TemplateSource {
    match config.resolve_templates_dir(root) {
        Some(dir) => TemplateSource::Directory(dir),
        None => TemplateSource::Embedded,
    }
}

pub fn require_initialized(root: &Path) -> anyhow::Result<()> {
    if !paths::claude_dir(root).is_dir() {
        return Err(ClaudioError::NotInitialized.into());
    }
    Ok(())
}

/// Drive `future` on a current-thread runtime. Only subprocess work goes
/// through here.
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

// ---------------------------------------------------------------------------
// Script-backed commands
// ---------------------------------------------------------------------------

/// Verify git and the assistant, then that `script` exists.
pub fn check_script_prerequisites(
    root: &Path,
    config: &Config,
    script: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let spinner = crate::ui::spinner("Checking prerequisites...", json);
    let result = claudio_core::tools::check_prerequisites(root, &config.assistant)
        .and_then(|()| ScriptRun::new(script.to_path_buf(), root).ensure_script());
    match result {
        Ok(()) => {
            spinner.finish_with_message("Prerequisites verified ✅");
            Ok(())
        }
        Err(e) => {
            spinner.abandon_with_message("Prerequisites check failed ❌");
            Err(e.into())
        }
    }
}

/// Run `run` under a spinner labelled `label`, refreshing the label with the
/// elapsed time while the script works.
pub fn run_with_spinner(
    run: &ScriptRun,
    label: &str,
    json: bool,
) -> anyhow::Result<Result<ScriptOutput, ProcessError>> {
    let spinner = crate::ui::spinner(format!("{label}..."), json);
    let result = block_on(run.run(|elapsed| {
        spinner.set_message(format!("{label}... ({}s elapsed)", elapsed.as_secs()));
    }))?;
    match &result {
        Ok(out) => spinner.finish_with_message(format!(
            "{label} completed in {}s ✅",
            out.elapsed.as_secs()
        )),
        Err(_) => spinner.abandon_with_message(format!("{label} failed ❌")),
    }
    Ok(result)
}

/// Echo the captured stderr of a failed script, if any.
pub fn print_script_stderr(err: &ProcessError) {
    if let Some(stderr) = err.stderr() {
        eprintln!("{}", "Standard Error:".red());
        eprintln!("{}", stderr.trim_end());
    }
}
