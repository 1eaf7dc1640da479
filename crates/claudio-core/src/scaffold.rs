//! The `.claude/` tree written by `init` and `quick`.
//!
//! State files under `current/` and `epics/` belong to the user once written
//! and are only created when missing. The three document templates under
//! `templates/` are managed and rewritten on every run.

use crate::io;
use crate::paths;
use crate::project::TechStack;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Lines added to `.gitignore`, each at most once.
pub const GITIGNORE_ENTRIES: &[&str] = &[
    "# Claude Development Files",
    ".claude/sessions/",
    ".claude-context.json",
    "analysis/",
];

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum FileOutcome {
    Created,
    Exists,
    Refreshed,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldEntry {
    /// Path relative to the workspace root.
    pub path: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScaffoldReport {
    pub entries: Vec<ScaffoldEntry>,
}

impl ScaffoldReport {
    fn push(&mut self, path: impl Into<String>, outcome: FileOutcome) {
        let path = path.into();
        if let FileOutcome::Failed(reason) = &outcome {
            tracing::warn!(path = %path, reason = %reason, "scaffold step failed");
        } else {
            tracing::debug!(path = %path, outcome = ?outcome, "scaffold step");
        }
        self.entries.push(ScaffoldEntry { path, outcome });
    }

    fn extend(&mut self, other: ScaffoldReport) {
        self.entries.extend(other.entries);
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScaffoldEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, FileOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn outcome_of(&self, path: &str) -> Option<&FileOutcome> {
        self.entries.iter().find(|e| e.path == path).map(|e| &e.outcome)
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Create every scaffold directory plus this month's session bucket.
pub fn create_structure(root: &Path, today: NaiveDate) -> ScaffoldReport {
    let mut report = ScaffoldReport::default();
    let month = paths::sessions_month_dir(root, today);
    let dirs = paths::SCAFFOLD_DIRS
        .iter()
        .map(|d| (d.to_string(), root.join(d)))
        .chain(std::iter::once((
            format!("{}/{}", paths::SESSIONS_DIR, today.format("%Y-%m")),
            month,
        )));

    for (rel, dir) in dirs {
        let existed = dir.is_dir();
        match io::ensure_dir(&dir) {
            Ok(()) if existed => report.push(rel, FileOutcome::Exists),
            Ok(()) => report.push(rel, FileOutcome::Created),
            Err(e) => report.push(rel, FileOutcome::Failed(e.to_string())),
        }
    }
    report
}

/// Write the four project state files, leaving existing ones untouched.
pub fn write_state_files(root: &Path, tech: &TechStack, today: NaiveDate) -> ScaffoldReport {
    let mut report = ScaffoldReport::default();
    let epics = tech.suggested_epics();
    let files = [
        (paths::PROJECT_STATE_MD, project_state_md(tech, today)),
        (paths::EPICS_ROADMAP_MD, epics_roadmap_md(&epics)),
        (paths::NEXT_SESSION_MD, NEXT_SESSION_CONTENT.to_string()),
        (paths::ACTIVE_EPIC_MD, ACTIVE_EPIC_CONTENT.to_string()),
    ];
    for (rel, content) in files {
        match io::write_if_missing(&root.join(rel), content.as_bytes()) {
            Ok(true) => report.push(rel, FileOutcome::Created),
            Ok(false) => report.push(rel, FileOutcome::Exists),
            Err(e) => report.push(rel, FileOutcome::Failed(e.to_string())),
        }
    }
    report
}

/// Rewrite the epic, session and decision document templates.
pub fn write_doc_templates(root: &Path) -> ScaffoldReport {
    let mut report = ScaffoldReport::default();
    let files = [
        ("epic-template.md", EPIC_TEMPLATE),
        ("session-template.md", SESSION_TEMPLATE),
        ("decision-template.md", DECISION_TEMPLATE),
    ];
    for (name, content) in files {
        let rel = format!("{}/{name}", paths::TEMPLATES_DIR);
        let path = root.join(&rel);
        let existed = path.exists();
        match io::atomic_write(&path, content.as_bytes()) {
            Ok(()) if existed => report.push(rel, FileOutcome::Refreshed),
            Ok(()) => report.push(rel, FileOutcome::Created),
            Err(e) => report.push(rel, FileOutcome::Failed(e.to_string())),
        }
    }
    report
}

/// Directories, state files and document templates in one pass.
pub fn scaffold(root: &Path, tech: &TechStack, today: NaiveDate) -> ScaffoldReport {
    let mut report = create_structure(root, today);
    report.extend(write_state_files(root, tech, today));
    report.extend(write_doc_templates(root));
    report
}

pub fn ensure_gitignore(root: &Path) -> crate::Result<usize> {
    io::ensure_gitignore_entries(root, GITIGNORE_ENTRIES)
}

// ---------------------------------------------------------------------------
// Generated content
// ---------------------------------------------------------------------------

fn project_state_md(tech: &TechStack, today: NaiveDate) -> String {
    let detected: Vec<String> = tech
        .flags()
        .iter()
        .filter(|(_, on)| *on)
        .map(|(label, _)| format!("- ✅ {label}"))
        .collect();
    let detected = if detected.is_empty() {
        "- None detected".to_string()
    } else {
        detected.join("\n")
    };

    format!(
        "# Project State

## Overview
Repository initialized with Claude development tools on {today}.

## Technology Stack Detected
{detected}

## Architecture
[To be documented as development progresses]

## Current Status
- 🚀 Project initialized
- 📋 Epics roadmap created
- 🔧 Development tools configured

## Recent Activity
- {today}: Project scaffolded with claudio

## Important Decisions
[Document major architectural and technical decisions here]

## Next Session Priority
- Review epics roadmap
- Choose first epic to develop
- Set up development environment if needed
",
        today = today.format("%Y-%m-%d"),
    )
}

fn epics_roadmap_md(epics: &[&str]) -> String {
    let suggested: Vec<String> = epics
        .iter()
        .enumerate()
        .map(|(i, epic)| format!("{}. **{epic}**", i + 1))
        .collect();
    let remaining: Vec<String> = epics
        .iter()
        .filter(|e| !e.contains("DOCS") && !e.contains("TESTING"))
        .enumerate()
        .map(|(i, epic)| format!("{}. **{epic}**", i + 3))
        .collect();

    format!(
        "# Epics Roadmap

## Suggested Epics (Based on Detected Technology)

{suggested}

## Epic Priority Order
[Reorder these based on project needs]

1. **EPIC-DOCS**: Documentation (Good starting point)
2. **EPIC-TESTING**: Quality Assurance (Establish testing foundation)
{remaining}

## Epic Status
- 📋 **TODO**: All epics
- 🔄 **IN_PROGRESS**: None
- ✅ **COMPLETED**: None

## Notes
Each epic should be broken down into smaller, atomic issues following the C.I.D.E.R. methodology.
",
        suggested = suggested.join("\n"),
        remaining = remaining.join("\n"),
    )
}

const NEXT_SESSION_CONTENT: &str = r#"# Next Session Plan

## Session Objectives
- [ ] Review project structure and technology stack
- [ ] Choose first epic to work on
- [ ] Generate first atomic issues
- [ ] Set up development workflow

## Preparation Checklist
- [ ] Review .claude/current/project-state.md
- [ ] Review .claude/epics/epics-roadmap.md
- [ ] Ensure development environment is ready
- [ ] Choose priority epic from roadmap

## Planned Activities
1. **Project Analysis**: Understand current codebase structure
2. **Epic Selection**: Choose highest priority epic
3. **Issue Generation**: Create 2-3 atomic issues for selected epic
4. **Development Setup**: Configure any needed development tools

## Expected Outcomes
- Active epic selected and documented
- First issues created and ready for development
- Clear plan for subsequent development sessions

## Notes
This is the initial planning session. Focus on understanding and organizing rather than coding.
"#;

const ACTIVE_EPIC_CONTENT: &str = r#"# Active Epic: [To Be Selected]

## Current Status
🔄 **No active epic yet**

## Selection Criteria
Choose an epic based on:
- Project priorities
- Dependencies
- Complexity (start with simpler epics)
- Business value

## When Epic is Selected
This file will be updated with:
- Epic details and objectives
- Current progress
- Active issues
- Next steps

## Commands to Get Started
Open the assistant and use:
```
/cider:list-epics
/cider:generate EPIC-NAME "issue description"
/cider:work ISSUE_NUMBER
```
"#;

const EPIC_TEMPLATE: &str = r#"# Epic XXX: [Name]

## Description
[Detailed description of the epic and its purpose]

## Objectives
- [ ] Objective 1
- [ ] Objective 2
- [ ] Objective 3

## Acceptance Criteria
- Criterion 1: [Specific, measurable criterion]
- Criterion 2: [Specific, measurable criterion]

## Tasks
- [ ] Task 1: [Specific task description]
- [ ] Task 2: [Specific task description]
- [ ] Task 3: [Specific task description]

## Status: [TODO/IN_PROGRESS/DONE]

## Technical Notes
[Important technical considerations, constraints, or dependencies]

## Business Value
[How this epic provides value to users/business]

## Definition of Done
- [ ] All objectives completed
- [ ] Acceptance criteria met
- [ ] Code reviewed and tested
- [ ] Documentation updated
"#;

const SESSION_TEMPLATE: &str = r#"# Session: [Description] - [Date]

## Session Objectives
- Objective 1
- Objective 2

## Changes Made
### Files Modified
- `file1`: Description of changes

### New Files Created
- `new_file`: Purpose and functionality

## Decisions Made
1. **Decision 1**: Reasoning and alternatives considered

## Problems Encountered
- Problem 1: How it was resolved

## Next Steps
- [ ] Step 1
- [ ] Step 2

## Active Epic Progress
[Update on current epic development progress]

## Session Duration
Start: [HH:MM]
End: [HH:MM]
Total: [Duration]
"#;

const DECISION_TEMPLATE: &str = r#"# Decision: [Decision Title]

## Date
[YYYY-MM-DD]

## Context
[What is the situation that requires a decision?]

## Decision
[What was decided?]

## Rationale
[Why was this decision made?]

## Alternatives Considered
1. **Alternative 1**: [Description and why it wasn't chosen]
2. **Alternative 2**: [Description and why it wasn't chosen]

## Consequences
### Positive
- [Positive consequence]

### Negative
- [Negative consequence]

## Implementation
[How will this decision be implemented?]

## Review Date
[When should this decision be reviewed?]
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn creates_full_tree() {
        let dir = TempDir::new().unwrap();
        let report = scaffold(dir.path(), &TechStack::default(), today());
        assert!(!report.has_failures());
        for d in paths::SCAFFOLD_DIRS {
            assert!(dir.path().join(d).is_dir(), "missing {d}");
        }
        assert!(dir.path().join(".claude/sessions/2026-10").is_dir());
        assert!(dir.path().join(paths::PROJECT_STATE_MD).is_file());
        assert!(dir.path().join(".claude/templates/decision-template.md").is_file());
    }

    #[test]
    fn state_files_are_not_overwritten() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), &TechStack::default(), today());
        let state = dir.path().join(paths::PROJECT_STATE_MD);
        std::fs::write(&state, "mine").unwrap();
        let tmpl = dir.path().join(".claude/templates/epic-template.md");
        std::fs::write(&tmpl, "stale").unwrap();

        let report = scaffold(dir.path(), &TechStack::default(), today());
        assert_eq!(std::fs::read_to_string(&state).unwrap(), "mine");
        assert_eq!(report.outcome_of(paths::PROJECT_STATE_MD), Some(&FileOutcome::Exists));
        assert_eq!(std::fs::read_to_string(&tmpl).unwrap(), EPIC_TEMPLATE);
        assert_eq!(
            report.outcome_of(".claude/templates/epic-template.md"),
            Some(&FileOutcome::Refreshed)
        );
    }

    #[test]
    fn project_state_lists_detected_stack() {
        let tech = TechStack {
            frontend: true,
            testing: true,
            ..TechStack::default()
        };
        let md = project_state_md(&tech, today());
        assert!(md.contains("- ✅ Frontend\n- ✅ Testing"));
        assert!(md.contains("2026-10-15"));
        assert!(md.contains("## Recent Activity\n- "));
    }

    #[test]
    fn roadmap_numbers_priority_list_after_docs_and_testing() {
        let tech = TechStack {
            backend: true,
            ..TechStack::default()
        };
        let md = epics_roadmap_md(&tech.suggested_epics());
        assert!(md.contains("1. **EPIC-BACKEND: Server-side Development**"));
        assert!(md.contains("3. **EPIC-BACKEND: Server-side Development**"));
        assert!(md.contains("4. **EPIC-PERFORMANCE: Optimization**"));
    }

    #[test]
    fn gitignore_entries_added_once() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "target/").unwrap();
        assert_eq!(ensure_gitignore(dir.path()).unwrap(), 4);
        assert_eq!(ensure_gitignore(dir.path()).unwrap(), 0);
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("target/\n# Claude Development Files\n"));
        assert_eq!(content.matches(".claude/sessions/").count(), 1);
    }

    #[test]
    fn blocked_directory_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".claude"), "not a dir").unwrap();
        let report = create_structure(dir.path(), today());
        assert!(report.has_failures());
        assert_eq!(report.outcome_of(".claude").map(|o| matches!(o, FileOutcome::Failed(_))), Some(true));
    }
}
