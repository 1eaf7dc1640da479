//! Read-only views of a workspace used by `status` and `check`.

use crate::paths;
use crate::tools;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

/// `.claude/`, `.claude/commands/` and the project state file all exist.
pub fn is_project_setup(root: &Path) -> bool {
    paths::claude_dir(root).is_dir()
        && root.join(paths::COMMANDS_DIR).is_dir()
        && paths::project_state_path(root).is_file()
}

static ACTIVE_EPIC_RE: OnceLock<Regex> = OnceLock::new();

fn active_epic_re() -> &'static Regex {
    ACTIVE_EPIC_RE.get_or_init(|| Regex::new(r"# Active Epic: (.+)").unwrap())
}

/// Title from the `# Active Epic: ...` heading of `active-epic.md`.
pub fn active_epic(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(paths::active_epic_path(root)).ok()?;
    active_epic_re()
        .captures(&content)
        .map(|c| c[1].trim().to_string())
}

/// First `limit` bullet lines of the `## Recent Activity` section of the
/// project state file.
pub fn recent_activity(root: &Path, limit: usize) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(paths::project_state_path(root)) else {
        return Vec::new();
    };
    content
        .lines()
        .skip_while(|l| l.trim_end() != "## Recent Activity")
        .skip(1)
        .take_while(|l| !l.starts_with("##"))
        .map(str::trim)
        .filter(|l| l.starts_with('-'))
        .take(limit)
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Setup checklist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SetupCheck {
    pub name: &'static str,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checks: Vec<SetupCheck>,
    pub passed: usize,
    pub total: usize,
}

impl CheckReport {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Run the configuration checklist against `root`.
pub fn run_checks(root: &Path, assistant: &str) -> CheckReport {
    let exists = |rel: &str| root.join(rel).exists();
    let gitignore_ok = std::fs::read_to_string(root.join(".gitignore"))
        .map(|c| c.contains(".claude/sessions/"))
        .unwrap_or(false);

    let checks = vec![
        SetupCheck {
            name: "Git repository",
            passed: tools::has_git_dir(root),
        },
        SetupCheck {
            name: "Assistant installed",
            passed: tools::assistant_available(assistant),
        },
        SetupCheck {
            name: ".gitignore configured",
            passed: gitignore_ok,
        },
        SetupCheck {
            name: ".claude/ structure",
            passed: exists(paths::CLAUDE_DIR),
        },
        SetupCheck {
            name: "Slash commands installed",
            passed: ["setup.md", "radar/analyze.md", "cider/generate.md"]
                .iter()
                .all(|f| root.join(paths::COMMANDS_DIR).join(f).is_file()),
        },
        SetupCheck {
            name: "Current state files",
            passed: exists(paths::PROJECT_STATE_MD) && exists(paths::ACTIVE_EPIC_MD),
        },
        SetupCheck {
            name: "Epic management",
            passed: exists(paths::EPICS_ROADMAP_MD),
        },
        SetupCheck {
            name: "Templates available",
            passed: exists(paths::TEMPLATES_DIR),
        },
        SetupCheck {
            name: "Development guides",
            passed: exists(paths::GUIDES_DIR),
        },
    ];

    let passed = checks.iter().filter(|c| c.passed).count();
    CheckReport {
        total: checks.len(),
        passed,
        checks,
    }
}
