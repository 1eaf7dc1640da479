use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const CURRENT_DIR: &str = ".claude/current";
pub const EPICS_DIR: &str = ".claude/epics";
pub const SESSIONS_DIR: &str = ".claude/sessions";
pub const GUIDES_DIR: &str = ".claude/guides";
pub const TEMPLATES_DIR: &str = ".claude/templates";
pub const COMMANDS_DIR: &str = ".claude/commands";
pub const RADAR_COMMANDS_DIR: &str = ".claude/commands/radar";
pub const CIDER_COMMANDS_DIR: &str = ".claude/commands/cider";

pub const MANIFEST_FILE: &str = ".claude/.version.json";
pub const CONFIG_FILE: &str = ".claude/config.yaml";

pub const PROJECT_STATE_MD: &str = ".claude/current/project-state.md";
pub const ACTIVE_EPIC_MD: &str = ".claude/current/active-epic.md";
pub const NEXT_SESSION_MD: &str = ".claude/current/next-session.md";
pub const EPICS_ROADMAP_MD: &str = ".claude/epics/epics-roadmap.md";

pub const PACKAGE_JSON: &str = "package.json";
pub const NPM_LOCKFILE: &str = "package-lock.json";
pub const YARN_LOCKFILE: &str = "yarn.lock";

/// Suffix carried by every shipped template file.
pub const TEMPLATE_SUFFIX: &str = ".template.md";

/// Every directory the scaffold creates, parents first.
pub const SCAFFOLD_DIRS: &[&str] = &[
    CLAUDE_DIR,
    CURRENT_DIR,
    EPICS_DIR,
    SESSIONS_DIR,
    GUIDES_DIR,
    TEMPLATES_DIR,
    COMMANDS_DIR,
    RADAR_COMMANDS_DIR,
    CIDER_COMMANDS_DIR,
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn claude_dir(root: &Path) -> PathBuf {
    root.join(CLAUDE_DIR)
}

pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn project_state_path(root: &Path) -> PathBuf {
    root.join(PROJECT_STATE_MD)
}

pub fn active_epic_path(root: &Path) -> PathBuf {
    root.join(ACTIVE_EPIC_MD)
}

/// Month bucket for session notes, e.g. `.claude/sessions/2026-10`.
pub fn sessions_month_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(SESSIONS_DIR).join(date.format("%Y-%m").to_string())
}

/// Installed file name for a template file name: `analyze.template.md` →
/// `analyze.md`. Names without the suffix are returned unchanged.
pub fn installed_file_name(template_name: &str) -> String {
    match template_name.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stem) => format!("{stem}.md"),
        None => template_name.to_string(),
    }
}

/// Display name for a template path: suffix stripped, slashes kept.
pub fn template_display_name(relative_path: &str) -> String {
    relative_path
        .strip_suffix(TEMPLATE_SUFFIX)
        .unwrap_or(relative_path)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_name_strips_suffix() {
        assert_eq!(installed_file_name("analyze.template.md"), "analyze.md");
        assert_eq!(installed_file_name("notes.md"), "notes.md");
    }

    #[test]
    fn display_name_keeps_namespace() {
        assert_eq!(template_display_name("radar/analyze.template.md"), "radar/analyze");
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            manifest_path(root),
            PathBuf::from("/tmp/proj/.claude/.version.json")
        );
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            sessions_month_dir(root, date),
            PathBuf::from("/tmp/proj/.claude/sessions/2026-03")
        );
    }
}
