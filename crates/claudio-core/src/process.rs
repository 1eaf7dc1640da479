//! Running the bundled bash scripts.
//!
//! Each script runs as `bash <script> <args...>` in the workspace root with
//! captured stdout and stderr. A timeout kills the child. Nothing is retried.

use crate::error::{ClaudioError, ProcessError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

pub const RADAR_SCRIPT: &str = "claude-radar.sh";
pub const ISSUE_GENERATOR_SCRIPT: &str = "claude-issue-generator.sh";
pub const ISSUE_WORKER_SCRIPT: &str = "claude-issue-worker.sh";

/// How often a running script reports progress.
pub const TICK_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// A script invocation. `timeout: None` waits indefinitely.
#[derive(Debug, Clone)]
pub struct ScriptRun {
    pub script: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Option<Duration>,
}

impl ScriptRun {
    pub fn new(script: PathBuf, cwd: &Path) -> Self {
        Self {
            script,
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fail early with [`ClaudioError::ScriptNotFound`] instead of letting
    /// bash report it.
    pub fn ensure_script(&self) -> Result<()> {
        if self.script.is_file() {
            Ok(())
        } else {
            Err(ClaudioError::ScriptNotFound(self.script.clone()))
        }
    }

    /// Run to completion. `on_tick` is called with the elapsed time every
    /// [`TICK_INTERVAL`] while the child is running.
    pub async fn run<F>(&self, mut on_tick: F) -> std::result::Result<ScriptOutput, ProcessError>
    where
        F: FnMut(Duration),
    {
        tracing::debug!(
            script = %self.script.display(),
            args = ?self.args,
            cwd = %self.cwd.display(),
            timeout_secs = self.timeout.map(|t| t.as_secs()),
            "running script"
        );

        let child = Command::new("bash")
            .arg(&self.script)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error("bash", e))?;

        let start = Instant::now();
        let output = child.wait_with_output();
        tokio::pin!(output);

        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + TICK_INTERVAL,
            TICK_INTERVAL,
        );
        let deadline = self.timeout.map(|t| tokio::time::Instant::now() + t);

        let output = loop {
            tokio::select! {
                result = &mut output => {
                    break result.map_err(|e| spawn_error("bash", e))?;
                }
                _ = ticker.tick() => {
                    on_tick(start.elapsed());
                }
                _ = sleep_until(deadline) => {
                    let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
                    tracing::warn!(script = %self.script.display(), secs, "script timed out");
                    // Dropping the pinned future drops the child, which kills it.
                    return Err(ProcessError::TimedOut { secs });
                }
            }
        };

        let elapsed = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::debug!(
            code = ?output.status.code(),
            elapsed_ms = elapsed.as_millis() as u64,
            stdout_len = stdout.len(),
            "script finished"
        );

        if !output.status.success() {
            return Err(ProcessError::Failed {
                code: output.status.code(),
                stderr,
            });
        }
        Ok(ScriptOutput {
            stdout,
            stderr,
            elapsed,
        })
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn spawn_error(program: &str, e: std::io::Error) -> ProcessError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ProcessError::NotFound {
            program: program.to_string(),
        }
    } else {
        ProcessError::Spawn {
            program: program.to_string(),
            source: e,
        }
    }
}

/// Every `*.md` file under `dir`, recursively, sorted by path. A missing
/// directory yields an empty list.
pub fn list_reports(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut reports: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(|e| e.into_path())
        .collect();
    reports.sort();
    reports
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
