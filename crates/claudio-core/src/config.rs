use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Optional per-project settings stored in `.claude/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name or path of the AI assistant binary.
    #[serde(default = "default_assistant")]
    pub assistant: String,
    /// Directory holding the radar and cider bash scripts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts_dir: Option<PathBuf>,
    /// Where the analysis script writes its reports, relative to the root.
    #[serde(default = "default_analysis_dir")]
    pub analysis_dir: PathBuf,
    #[serde(default = "default_radar_timeout")]
    pub radar_timeout_secs: u64,
    /// On-disk template tree used instead of the embedded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

fn default_assistant() -> String {
    "claude".to_string()
}

fn default_analysis_dir() -> PathBuf {
    PathBuf::from("analysis")
}

fn default_radar_timeout() -> u64 {
    900
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant: default_assistant(),
            scripts_dir: None,
            analysis_dir: default_analysis_dir(),
            radar_timeout_secs: default_radar_timeout(),
            templates_dir: None,
        }
    }
}

impl Config {
    /// Load `.claude/config.yaml`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Apply `CLAUDIO_*` environment overrides on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("CLAUDIO_ASSISTANT") {
            if !v.trim().is_empty() {
                self.assistant = v;
            }
        }
        if let Some(v) = std::env::var_os("CLAUDIO_SCRIPTS_DIR") {
            self.scripts_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = std::env::var_os("CLAUDIO_TEMPLATES_DIR") {
            self.templates_dir = Some(PathBuf::from(v));
        }
        self
    }

    /// Scripts directory: configured value (relative paths resolve against
    /// `root`), else the directory of the running executable.
    pub fn resolve_scripts_dir(&self, root: &Path) -> PathBuf {
        match &self.scripts_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| root.to_path_buf()),
        }
    }

    pub fn resolve_analysis_dir(&self, root: &Path) -> PathBuf {
        if self.analysis_dir.is_absolute() {
            self.analysis_dir.clone()
        } else {
            root.join(&self.analysis_dir)
        }
    }

    pub fn resolve_templates_dir(&self, root: &Path) -> Option<PathBuf> {
        self.templates_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                root.join(dir)
            }
        })
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.assistant.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "assistant is empty".to_string(),
            });
        }

        if self.radar_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "radar_timeout_secs is 0; every analysis run will time out".to_string(),
            });
        }

        if self.scripts_dir.is_some() {
            let dir = self.resolve_scripts_dir(root);
            if !dir.is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("scripts_dir '{}' does not exist", dir.display()),
                });
            }
        }

        if let Some(dir) = self.resolve_templates_dir(root) {
            if !dir.is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "templates_dir '{}' does not exist; no templates will be found",
                        dir.display()
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.assistant, "claude");
        assert_eq!(cfg.radar_timeout_secs, 900);
        assert_eq!(cfg.analysis_dir, PathBuf::from("analysis"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        std::fs::write(
            dir.path().join(".claude/config.yaml"),
            "radar_timeout_secs: 60\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.radar_timeout_secs, 60);
        assert_eq!(cfg.assistant, "claude");
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            assistant: "my-claude".to_string(),
            ..Config::default()
        };
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.assistant, "my-claude");
    }

    #[test]
    fn validate_flags_zero_timeout_and_missing_templates() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            radar_timeout_secs: 0,
            templates_dir: Some(PathBuf::from("nope")),
            ..Config::default()
        };
        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }

    #[test]
    fn relative_dirs_resolve_against_root() {
        let root = Path::new("/tmp/proj");
        let cfg = Config {
            scripts_dir: Some(PathBuf::from("scripts")),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_scripts_dir(root), PathBuf::from("/tmp/proj/scripts"));
        assert_eq!(cfg.resolve_analysis_dir(root), PathBuf::from("/tmp/proj/analysis"));
    }
}
