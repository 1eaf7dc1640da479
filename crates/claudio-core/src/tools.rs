//! Presence checks and short invocations of the external tools claudio
//! relies on: git and the AI assistant binary.

use crate::error::{ClaudioError, ProcessError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const ASSISTANT_INSTALL_HINT: &str = "install with: curl -sSL https://claude.ai/install | sh";
pub const GIT_INIT_HINT: &str =
    "initialize with: git init && git add . && git commit -m \"Initial commit\"";

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

/// Resolve the assistant binary on PATH (or as given, when it is a path).
pub fn find_assistant(bin: &str) -> Option<PathBuf> {
    which::which(bin).ok()
}

/// True when the assistant resolves and answers `--version` successfully.
pub fn assistant_available(bin: &str) -> bool {
    let Some(path) = find_assistant(bin) else {
        tracing::debug!(bin, "assistant not on PATH");
        return false;
    };
    let ok = Command::new(&path)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    tracing::debug!(bin, path = %path.display(), ok, "assistant version check");
    ok
}

/// Launch the assistant interactively in `root` with the terminal attached.
pub fn open_assistant(bin: &str, root: &Path) -> Result<()> {
    let path = find_assistant(bin).ok_or_else(|| ClaudioError::AssistantNotFound(bin.to_string()))?;
    let status = Command::new(&path)
        .current_dir(root)
        .status()
        .map_err(|e| ProcessError::Spawn {
            program: bin.to_string(),
            source: e,
        })?;
    if !status.success() {
        return Err(ProcessError::Failed {
            code: status.code(),
            stderr: String::new(),
        }
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

pub fn has_git_dir(root: &Path) -> bool {
    root.join(".git").exists()
}

/// `git rev-parse --git-dir` succeeds in `root`.
pub fn is_git_repo(root: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn git(root: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: "git".to_string(),
                }
            } else {
                ProcessError::Spawn {
                    program: "git".to_string(),
                    source: e,
                }
            }
        })?;
    if !output.status.success() {
        return Err(ProcessError::Failed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }
    Ok(())
}

/// `git init`, stage everything, and make the first commit.
pub fn init_and_commit(root: &Path, message: &str) -> Result<()> {
    git(root, &["init"])?;
    git(root, &["add", "."])?;
    git(root, &["commit", "-m", message])?;
    tracing::debug!(root = %root.display(), "initialized git repository");
    Ok(())
}

/// Checks shared by every script-backed command: a git repository and a
/// working assistant.
pub fn check_prerequisites(root: &Path, assistant: &str) -> Result<()> {
    if !is_git_repo(root) {
        return Err(ClaudioError::NotAGitRepository);
    }
    if !assistant_available(assistant) {
        return Err(ClaudioError::AssistantNotFound(assistant.to_string()));
    }
    Ok(())
}

/// Remediation hint printed alongside a prerequisite error.
pub fn hint_for(err: &ClaudioError) -> Option<String> {
    match err {
        ClaudioError::NotAGitRepository => Some(GIT_INIT_HINT.to_string()),
        ClaudioError::AssistantNotFound(_) => Some(ASSISTANT_INSTALL_HINT.to_string()),
        ClaudioError::ScriptNotFound(path) => {
            Some(format!("expected script at: {}", path.display()))
        }
        ClaudioError::NotInitialized => Some("run: claudio init".to_string()),
        _ => None,
    }
}
