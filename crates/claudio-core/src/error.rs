use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudioError {
    #[error("not initialized: no .claude directory found (run 'claudio init')")]
    NotInitialized,

    #[error("not a git repository: run from a git repository root")]
    NotAGitRepository,

    #[error("assistant '{0}' not found on PATH")]
    AssistantNotFound(String),

    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("invalid update policy: {0}")]
    InvalidPolicy(String),

    #[error("template path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure modes of an external script invocation.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("timed out after {secs} seconds")]
    TimedOut { secs: u64 },

    #[error("not found: {program}")]
    NotFound { program: String },

    #[error("exited with {}", code.map(|c| format!("status {c}")).unwrap_or_else(|| "a signal".to_string()))]
    Failed { code: Option<i32>, stderr: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Captured standard error of the child, when it produced any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ProcessError::Failed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClaudioError>;
