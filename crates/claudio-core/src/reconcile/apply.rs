use super::diff::{ClassifiedUpdate, UpdateKind};
use crate::error::{ClaudioError, Result};
use crate::project::ProjectContext;
use crate::templates::{Category, TemplateDescriptor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// UpdatePolicy
// ---------------------------------------------------------------------------

/// What an apply pass is allowed to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePolicy {
    /// Install command templates that have no installed counterpart.
    pub install_new: bool,
    /// Overwrite installed files whose content differs from the template.
    pub overwrite_updated: bool,
    /// Copy an installed file aside before overwriting it.
    pub backup_before_overwrite: bool,
    /// Install guide templates that have no installed counterpart.
    pub install_new_guides: bool,
}

impl UpdatePolicy {
    /// New commands and guides only; never touch existing files.
    pub fn additive() -> Self {
        Self {
            install_new: true,
            install_new_guides: true,
            ..Self::default()
        }
    }

    /// Everything, with a backup of every overwritten file.
    pub fn force() -> Self {
        Self {
            install_new: true,
            overwrite_updated: true,
            backup_before_overwrite: true,
            install_new_guides: true,
        }
    }

    /// Managed scaffold refresh: install and overwrite without backups.
    pub fn scaffold() -> Self {
        Self {
            install_new: true,
            overwrite_updated: true,
            backup_before_overwrite: false,
            install_new_guides: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backup_before_overwrite && !self.overwrite_updated {
            return Err(ClaudioError::InvalidPolicy(
                "backup_before_overwrite requires overwrite_updated".to_string(),
            ));
        }
        Ok(())
    }

    fn installs_new(&self, category: Category) -> bool {
        match category {
            Category::Commands => self.install_new,
            Category::Guides => self.install_new_guides,
        }
    }
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Installed path relative to `.claude/`.
    pub path: String,
    pub name: String,
    pub category: Category,
    pub kind: UpdateKind,
}

impl ReportEntry {
    fn from_update(update: &ClassifiedUpdate) -> Self {
        let template = update.template();
        Self {
            path: template.installed_relative_path(),
            name: template.display_name.clone(),
            category: template.category,
            kind: update.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    #[serde(flatten)]
    pub entry: ReportEntry,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub succeeded: Vec<ReportEntry>,
    pub failed: Vec<FailedEntry>,
    pub skipped: Vec<ReportEntry>,
    /// Backup files written during this pass.
    pub backups: Vec<PathBuf>,
}

impl ApplyReport {
    pub fn succeeded_paths(&self) -> Vec<&str> {
        self.succeeded.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn skipped_paths(&self) -> Vec<&str> {
        self.skipped.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn failed_paths(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.entry.path.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// Write classified updates according to `policy`.
///
/// The policy is validated before anything is touched. After that the pass
/// always runs over every item in order; a failing item is recorded in
/// [`ApplyReport::failed`] and the next item is attempted.
pub fn apply(
    updates: &[ClassifiedUpdate],
    policy: &UpdatePolicy,
    ctx: &ProjectContext,
) -> Result<ApplyReport> {
    policy.validate()?;

    let mut report = ApplyReport::default();
    for update in updates {
        let entry = ReportEntry::from_update(update);
        match update {
            ClassifiedUpdate::Unchanged { .. } => report.skipped.push(entry),
            ClassifiedUpdate::New { template, target } => {
                if !policy.installs_new(template.category) {
                    report.skipped.push(entry);
                    continue;
                }
                match write_rendered(target, template, ctx) {
                    Ok(()) => {
                        tracing::debug!(path = %entry.path, "installed template");
                        report.succeeded.push(entry);
                    }
                    Err(e) => report.failed.push(failed(entry, &e)),
                }
            }
            ClassifiedUpdate::Updated { template, target } => {
                if !policy.overwrite_updated {
                    report.skipped.push(entry);
                    continue;
                }
                if policy.backup_before_overwrite {
                    match backup_file(target) {
                        Ok(backup) => {
                            tracing::debug!(path = %entry.path, backup = %backup.display(), "backed up");
                            report.backups.push(backup);
                        }
                        Err(e) => {
                            report.failed.push(FailedEntry {
                                entry,
                                reason: format!("backup failed: {e}"),
                            });
                            continue;
                        }
                    }
                }
                match write_rendered(target, template, ctx) {
                    Ok(()) => {
                        tracing::debug!(path = %entry.path, "overwrote template");
                        report.succeeded.push(entry);
                    }
                    Err(e) => report.failed.push(failed(entry, &e)),
                }
            }
        }
    }
    Ok(report)
}

fn failed(entry: ReportEntry, err: &std::io::Error) -> FailedEntry {
    tracing::warn!(path = %entry.path, error = %err, "template write failed");
    FailedEntry {
        entry,
        reason: err.to_string(),
    }
}

fn write_rendered(
    target: &Path,
    template: &TemplateDescriptor,
    ctx: &ProjectContext,
) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, template.render(ctx))
}

/// Copy `target` to `<target>.backup.<unix-millis>`, adding a `-<n>` suffix
/// when that name is already taken.
pub fn backup_file(target: &Path) -> std::io::Result<PathBuf> {
    let stamp = chrono::Utc::now().timestamp_millis();
    let base = format!("{}.backup.{stamp}", target.display());
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{base}-{n}"));
        n += 1;
    }
    std::fs::copy(target, &candidate)?;
    Ok(candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::diff::diff;
    use crate::templates::TemplateSource;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        templates: PathBuf,
        root: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let templates = tmp.path().join("templates");
            let root = tmp.path().join("demo");
            std::fs::create_dir_all(&root).unwrap();
            Self {
                _tmp: tmp,
                templates,
                root,
            }
        }

        fn template(&self, rel: &str, content: &str) {
            write(&self.templates, rel, content);
        }

        fn installed(&self, rel: &str, content: &str) {
            write(&self.root.join(".claude"), rel, content);
        }

        fn read(&self, rel: &str) -> String {
            std::fs::read_to_string(self.root.join(".claude").join(rel)).unwrap()
        }

        fn source(&self) -> TemplateSource {
            TemplateSource::Directory(self.templates.clone())
        }

        fn ctx(&self) -> ProjectContext {
            ProjectContext::detect(&self.root)
        }

        fn run(&self, policy: UpdatePolicy) -> (Vec<UpdateKind>, ApplyReport) {
            let updates = diff(&self.source(), &self.root).unwrap();
            let kinds = updates.iter().map(|u| u.kind()).collect();
            let report = apply(&updates, &policy, &self.ctx()).unwrap();
            (kinds, report)
        }

        fn backups_of(&self, rel: &str) -> Vec<PathBuf> {
            let target = self.root.join(".claude").join(rel);
            let prefix = format!("{}.backup.", target.file_name().unwrap().to_string_lossy());
            std::fs::read_dir(target.parent().unwrap())
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
                .map(|e| e.path())
                .collect()
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn installs_new_and_skips_unchanged() {
        let fx = Fixture::new();
        fx.template("commands/a.template.md", "hello");
        fx.template("commands/b.template.md", "world");
        fx.installed("commands/a.md", "hello");

        let policy = UpdatePolicy {
            install_new: true,
            ..UpdatePolicy::default()
        };
        let (kinds, report) = fx.run(policy);
        assert_eq!(kinds, vec![UpdateKind::Unchanged, UpdateKind::New]);
        assert_eq!(report.succeeded_paths(), vec!["commands/b.md"]);
        assert_eq!(report.skipped_paths(), vec!["commands/a.md"]);
        assert!(report.failed.is_empty());
        assert_eq!(fx.read("commands/b.md"), "world");
        assert_eq!(fx.read("commands/a.md"), "hello");
    }

    #[test]
    fn second_pass_is_all_unchanged() {
        let fx = Fixture::new();
        fx.template("commands/radar/analyze.template.md", "analyze");
        fx.template("guides/g.template.md", "guide");

        let (first, report) = fx.run(UpdatePolicy::additive());
        assert_eq!(first, vec![UpdateKind::New, UpdateKind::New]);
        assert_eq!(report.succeeded.len(), 2);

        let (second, report) = fx.run(UpdatePolicy::additive());
        assert_eq!(second, vec![UpdateKind::Unchanged, UpdateKind::Unchanged]);
        assert!(report.succeeded.is_empty());
        assert_eq!(report.skipped.len(), 2);
    }

    #[test]
    fn updated_without_overwrite_is_left_alone() {
        let fx = Fixture::new();
        fx.template("commands/a.template.md", "new body");
        fx.installed("commands/a.md", "user edits");

        let (kinds, report) = fx.run(UpdatePolicy::additive());
        assert_eq!(kinds, vec![UpdateKind::Updated]);
        assert_eq!(report.skipped_paths(), vec!["commands/a.md"]);
        assert_eq!(fx.read("commands/a.md"), "user edits");
        assert!(fx.backups_of("commands/a.md").is_empty());
    }

    #[test]
    fn overwrite_with_backup_keeps_exactly_one_copy() {
        let fx = Fixture::new();
        fx.template("commands/a.template.md", "for {{PROJECT_NAME}}");
        fx.installed("commands/a.md", "user edits");

        let (_, report) = fx.run(UpdatePolicy::force());
        assert_eq!(report.succeeded_paths(), vec!["commands/a.md"]);
        assert_eq!(fx.read("commands/a.md"), "for demo");

        let backups = fx.backups_of("commands/a.md");
        assert_eq!(backups.len(), 1);
        assert_eq!(report.backups, backups);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), "user edits");
    }

    #[test]
    fn unchanged_gets_no_backup() {
        let fx = Fixture::new();
        fx.template("commands/a.template.md", "same");
        fx.installed("commands/a.md", "same");

        let (_, report) = fx.run(UpdatePolicy::force());
        assert_eq!(report.skipped_paths(), vec!["commands/a.md"]);
        assert!(report.backups.is_empty());
        assert!(fx.backups_of("commands/a.md").is_empty());
    }

    #[test]
    fn guides_follow_their_own_switch() {
        let fx = Fixture::new();
        fx.template("commands/c.template.md", "c");
        fx.template("guides/g.template.md", "g");

        let policy = UpdatePolicy {
            install_new: true,
            install_new_guides: false,
            ..UpdatePolicy::default()
        };
        let (_, report) = fx.run(policy);
        assert_eq!(report.succeeded_paths(), vec!["commands/c.md"]);
        assert_eq!(report.skipped_paths(), vec!["guides/g.md"]);
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let fx = Fixture::new();
        fx.template("commands/a.template.md", "a");
        fx.template("commands/b.template.md", "b");
        // A directory where a file is expected makes the write fail.
        std::fs::create_dir_all(fx.root.join(".claude/commands/a.md")).unwrap();

        let policy = UpdatePolicy {
            overwrite_updated: true,
            ..UpdatePolicy::additive()
        };
        let (kinds, report) = fx.run(policy);
        assert_eq!(kinds, vec![UpdateKind::Updated, UpdateKind::New]);
        assert_eq!(report.failed_paths(), vec!["commands/a.md"]);
        assert_eq!(report.succeeded_paths(), vec!["commands/b.md"]);
    }

    #[test]
    fn failed_backup_skips_the_write() {
        let fx = Fixture::new();
        fx.template("commands/a.template.md", "a");
        std::fs::create_dir_all(fx.root.join(".claude/commands/a.md")).unwrap();

        let (_, report) = fx.run(UpdatePolicy::force());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.starts_with("backup failed"));
        assert!(fx.root.join(".claude/commands/a.md").is_dir());
    }

    #[test]
    fn backup_without_overwrite_is_rejected() {
        let policy = UpdatePolicy {
            backup_before_overwrite: true,
            ..UpdatePolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(ClaudioError::InvalidPolicy(_))
        ));
        assert!(apply(&[], &policy, &ProjectContext::detect(Path::new("/tmp"))).is_err());
    }

    #[test]
    fn backup_names_never_collide() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.md");
        std::fs::write(&target, "x").unwrap();
        let first = backup_file(&target).unwrap();
        let second = backup_file(&target).unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }
}
