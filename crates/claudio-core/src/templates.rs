//! Shipped template files and the two trees they can be read from.
//!
//! A template tree has a `commands/` and a `guides/` subtree. Only files
//! ending in [`TEMPLATE_SUFFIX`](crate::paths::TEMPLATE_SUFFIX) are
//! templates; anything else in the tree is ignored. Templates are returned
//! in depth-first order with subdirectories ahead of files at every level.

use crate::error::{ClaudioError, Result};
use crate::paths;
use crate::project::{substitute, ProjectContext};
use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct EmbeddedTemplates;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Commands,
    Guides,
}

impl Category {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Commands => "commands",
            Category::Guides => "guides",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "commands" => Some(Category::Commands),
            "guides" => Some(Category::Guides),
            _ => None,
        }
    }

    /// Installed location of this category inside a workspace.
    pub fn installed_dir(&self, root: &Path) -> PathBuf {
        paths::claude_dir(root).join(self.dir_name())
    }
}

// ---------------------------------------------------------------------------
// TemplateDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TemplateDescriptor {
    pub category: Category,
    /// Slash-separated path inside the category, e.g. `radar/analyze.template.md`.
    pub relative_path: String,
    /// `relative_path` without the template suffix, e.g. `radar/analyze`.
    pub display_name: String,
    pub content: Vec<u8>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl TemplateDescriptor {
    fn new(
        category: Category,
        relative_path: String,
        content: Vec<u8>,
        modified_at: Option<DateTime<Utc>>,
    ) -> Self {
        let display_name = paths::template_display_name(&relative_path);
        Self {
            category,
            relative_path,
            display_name,
            content,
            modified_at,
        }
    }

    /// Installed path relative to `.claude/`, e.g. `commands/radar/analyze.md`.
    pub fn installed_relative_path(&self) -> String {
        let installed = match self.relative_path.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/{}", paths::installed_file_name(file)),
            None => paths::installed_file_name(&self.relative_path),
        };
        format!("{}/{installed}", self.category.dir_name())
    }

    /// Bytes an install writes for this template: placeholders substituted
    /// from `ctx` when the content is UTF-8, raw bytes otherwise.
    pub fn render(&self, ctx: &ProjectContext) -> Vec<u8> {
        match std::str::from_utf8(&self.content) {
            Ok(text) => substitute(text, ctx).into_bytes(),
            Err(_) => self.content.clone(),
        }
    }

    /// Absolute target path of this template inside `root`.
    pub fn target_path(&self, root: &Path) -> PathBuf {
        let mut target = paths::claude_dir(root);
        for part in self.installed_relative_path().split('/') {
            target.push(part);
        }
        target
    }
}

// ---------------------------------------------------------------------------
// TemplateSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The tree compiled into the binary.
    Embedded,
    /// An on-disk tree with the same layout.
    Directory(PathBuf),
}

impl TemplateSource {
    /// Read every template in traversal order. A missing directory yields an
    /// empty list.
    pub fn scan(&self) -> Result<Vec<TemplateDescriptor>> {
        match self {
            TemplateSource::Embedded => Ok(scan_embedded()),
            TemplateSource::Directory(dir) => scan_directory(dir),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Embedded => "embedded templates".to_string(),
            TemplateSource::Directory(dir) => dir.display().to_string(),
        }
    }
}

fn scan_embedded() -> Vec<TemplateDescriptor> {
    let mut files: Vec<String> = EmbeddedTemplates::iter()
        .map(|p| p.into_owned())
        .collect();
    files.sort_by(|a, b| traversal_order(a, b));

    files
        .into_iter()
        .filter_map(|path| {
            let (category, relative) = split_category(&path)?;
            let file = EmbeddedTemplates::get(&path)?;
            let modified_at = file
                .metadata
                .last_modified()
                .and_then(|secs| DateTime::from_timestamp(secs as i64, 0));
            Some(TemplateDescriptor::new(
                category,
                relative.to_string(),
                file.data.into_owned(),
                modified_at,
            ))
        })
        .collect()
}

fn scan_directory(dir: &Path) -> Result<Vec<TemplateDescriptor>> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "template directory missing, nothing to scan");
        return Ok(Vec::new());
    }

    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .sort_by(|a, b| {
            let a_dir = a.file_type().is_dir();
            let b_dir = b.file_type().is_dir();
            b_dir.cmp(&a_dir).then_with(|| a.file_name().cmp(b.file_name()))
        });

    let mut templates = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| ClaudioError::NonUtf8Path(entry.path().to_path_buf()))?;
        let rel = slash_path(rel).ok_or_else(|| ClaudioError::NonUtf8Path(entry.path().to_path_buf()))?;
        let Some((category, relative)) = split_category(&rel) else {
            continue;
        };
        let content = std::fs::read(entry.path())?;
        let modified_at = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);
        templates.push(TemplateDescriptor::new(
            category,
            relative.to_string(),
            content,
            modified_at,
        ));
    }
    Ok(templates)
}

/// Split `commands/radar/analyze.template.md` into its category and the
/// path inside it. Returns `None` for non-template files and files outside a
/// known category.
fn split_category(path: &str) -> Option<(Category, &str)> {
    let (first, rest) = path.split_once('/')?;
    let category = Category::from_dir_name(first)?;
    if !rest.ends_with(paths::TEMPLATE_SUFFIX) {
        tracing::debug!(path, "ignoring non-template file");
        return None;
    }
    Some((category, rest))
}

fn slash_path(path: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = path.components().map(|c| c.as_os_str().to_str()).collect();
    parts.map(|p| p.join("/"))
}

/// Order two slash-separated file paths the way a depth-first walk that
/// visits subdirectories before files would.
pub fn traversal_order(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('/').collect();
    let b_parts: Vec<&str> = b.split('/').collect();
    for (i, (x, y)) in a_parts.iter().zip(b_parts.iter()).enumerate() {
        if x == y {
            continue;
        }
        let x_is_dir = i + 1 < a_parts.len();
        let y_is_dir = i + 1 < b_parts.len();
        return y_is_dir.cmp(&x_is_dir).then_with(|| x.cmp(y));
    }
    a_parts.len().cmp(&b_parts.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
