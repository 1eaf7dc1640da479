use crate::error::Result;
use crate::project::ProjectContext;
use crate::templates::{Category, TemplateDescriptor, TemplateSource};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    New,
    Updated,
    Unchanged,
}

/// One template paired with its installed target, classified by comparing
/// their contents.
#[derive(Debug, Clone)]
pub enum ClassifiedUpdate {
    New {
        template: TemplateDescriptor,
        target: PathBuf,
    },
    Updated {
        template: TemplateDescriptor,
        target: PathBuf,
    },
    Unchanged {
        template: TemplateDescriptor,
        target: PathBuf,
    },
}

impl ClassifiedUpdate {
    pub fn kind(&self) -> UpdateKind {
        match self {
            ClassifiedUpdate::New { .. } => UpdateKind::New,
            ClassifiedUpdate::Updated { .. } => UpdateKind::Updated,
            ClassifiedUpdate::Unchanged { .. } => UpdateKind::Unchanged,
        }
    }

    pub fn template(&self) -> &TemplateDescriptor {
        match self {
            ClassifiedUpdate::New { template, .. }
            | ClassifiedUpdate::Updated { template, .. }
            | ClassifiedUpdate::Unchanged { template, .. } => template,
        }
    }

    pub fn target(&self) -> &Path {
        match self {
            ClassifiedUpdate::New { target, .. }
            | ClassifiedUpdate::Updated { target, .. }
            | ClassifiedUpdate::Unchanged { target, .. } => target,
        }
    }

    /// True for items an apply pass could write.
    pub fn is_pending(&self) -> bool {
        !matches!(self, ClassifiedUpdate::Unchanged { .. })
    }

    pub fn is(&self, category: Category, kind: UpdateKind) -> bool {
        self.template().category == category && self.kind() == kind
    }
}

/// The installed side of one template, read fresh for each diff.
#[derive(Debug, Clone)]
pub struct InstalledFile {
    pub relative_path: String,
    pub target_path: PathBuf,
    pub existing_content: Option<Vec<u8>>,
}

impl InstalledFile {
    pub fn read(root: &Path, template: &TemplateDescriptor) -> Result<Self> {
        let target_path = template.target_path(root);
        let existing_content = if target_path.is_dir() {
            Some(directory_placeholder(&target_path)?)
        } else if target_path.exists() {
            Some(std::fs::read(&target_path)?)
        } else {
            None
        };
        Ok(Self {
            relative_path: template.installed_relative_path(),
            target_path,
            existing_content,
        })
    }
}

/// Stand-in content for a directory sitting where a file is expected: its
/// sorted entry names, one per line.
fn directory_placeholder(dir: &Path) -> Result<Vec<u8>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names.join("\n").into_bytes())
}

/// Classify every template in `source` against the workspace at `root`.
/// Read-only.
pub fn diff(source: &TemplateSource, root: &Path) -> Result<Vec<ClassifiedUpdate>> {
    classify(source.scan()?, root)
}

/// Classify already-scanned templates, preserving their order. Installed
/// files are compared with the template as rendered for `root`.
pub fn classify(templates: Vec<TemplateDescriptor>, root: &Path) -> Result<Vec<ClassifiedUpdate>> {
    let ctx = ProjectContext::detect(root);
    let mut updates = Vec::with_capacity(templates.len());
    for template in templates {
        let installed = InstalledFile::read(root, &template)?;
        let target = installed.target_path;
        let update = match installed.existing_content {
            None => ClassifiedUpdate::New { template, target },
            Some(existing) if existing == template.render(&ctx) => {
                ClassifiedUpdate::Unchanged { template, target }
            }
            Some(_) => ClassifiedUpdate::Updated { template, target },
        };
        tracing::debug!(
            path = %installed.relative_path,
            kind = ?update.kind(),
            "classified template"
        );
        updates.push(update);
    }
    Ok(updates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn fixture() -> (TempDir, TemplateSource, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("templates");
        let root = tmp.path().join("project");
        std::fs::create_dir_all(&root).unwrap();
        (tmp, TemplateSource::Directory(source), root)
    }

    fn kinds(updates: &[ClassifiedUpdate]) -> Vec<(String, UpdateKind)> {
        updates
            .iter()
            .map(|u| (u.template().installed_relative_path(), u.kind()))
            .collect()
    }

    #[test]
    fn absent_target_is_new_equal_is_unchanged() {
        let (tmp, source, root) = fixture();
        write(&tmp.path().join("templates"), "commands/a.template.md", "hello");
        write(&tmp.path().join("templates"), "commands/b.template.md", "world");
        write(&root, ".claude/commands/a.md", "hello");

        let updates = diff(&source, &root).unwrap();
        assert_eq!(
            kinds(&updates),
            vec![
                ("commands/a.md".to_string(), UpdateKind::Unchanged),
                ("commands/b.md".to_string(), UpdateKind::New),
            ]
        );
        assert_eq!(updates[1].target(), root.join(".claude/commands/b.md"));
    }

    #[test]
    fn differing_content_is_updated() {
        let (tmp, source, root) = fixture();
        write(&tmp.path().join("templates"), "guides/g.template.md", "v2");
        write(&root, ".claude/guides/g.md", "v1");

        let updates = diff(&source, &root).unwrap();
        assert_eq!(
            kinds(&updates),
            vec![("guides/g.md".to_string(), UpdateKind::Updated)]
        );
        assert!(updates[0].is(Category::Guides, UpdateKind::Updated));
    }

    #[test]
    fn directory_at_target_counts_as_existing() {
        let (tmp, source, root) = fixture();
        write(&tmp.path().join("templates"), "commands/x.template.md", "body");
        std::fs::create_dir_all(root.join(".claude/commands/x.md")).unwrap();

        let updates = diff(&source, &root).unwrap();
        assert_eq!(updates[0].kind(), UpdateKind::Updated);
    }

    #[test]
    fn rendered_copy_is_unchanged() {
        let (tmp, source, root) = fixture();
        write(
            &tmp.path().join("templates"),
            "commands/setup.template.md",
            "# Setup {{PROJECT_NAME}}",
        );
        // The project name comes from the root directory, `project`.
        write(&root, ".claude/commands/setup.md", "# Setup project");

        let updates = diff(&source, &root).unwrap();
        assert_eq!(updates[0].kind(), UpdateKind::Unchanged);

        // The raw template text is stale once rendered content is installed.
        write(&root, ".claude/commands/setup.md", "# Setup {{PROJECT_NAME}}");
        let updates = diff(&source, &root).unwrap();
        assert_eq!(updates[0].kind(), UpdateKind::Updated);
    }

    #[test]
    fn missing_source_yields_nothing() {
        let (_tmp, source, root) = fixture();
        assert!(diff(&source, &root).unwrap().is_empty());
    }

    #[test]
    fn diff_has_no_side_effects() {
        let (tmp, source, root) = fixture();
        write(&tmp.path().join("templates"), "commands/radar/a.template.md", "x");
        diff(&source, &root).unwrap();
        assert!(!root.join(".claude").exists());
    }
}
