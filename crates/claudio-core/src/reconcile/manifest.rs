use crate::paths;
use crate::templates::TemplateDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version reported when nothing has been recorded yet.
pub const UNVERSIONED: &str = "0.0.0";

/// Contents of `.claude/.version.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "version", default = "unversioned")]
    pub installed_version: String,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "templates", default)]
    pub installed_templates: Vec<ManifestEntry>,
}

fn unversioned() -> String {
    UNVERSIONED.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Installed path relative to `.claude/`.
    pub path: String,
    pub name: String,
    #[serde(rename = "modified", default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<&TemplateDescriptor> for ManifestEntry {
    fn from(t: &TemplateDescriptor) -> Self {
        Self {
            path: t.installed_relative_path(),
            name: t.display_name.clone(),
            modified_at: t.modified_at,
        }
    }
}

/// Read the manifest. Missing yields `None` silently; unreadable yields
/// `None` with a warning.
pub fn read_manifest(root: &Path) -> Option<Manifest> {
    let path = paths::manifest_path(root);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read version manifest");
            return None;
        }
    };
    match serde_json::from_str(&data) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed version manifest");
            None
        }
    }
}

pub fn installed_version(root: &Path) -> String {
    read_manifest(root)
        .map(|m| m.installed_version)
        .unwrap_or_else(unversioned)
}

/// Overwrite the manifest with `version` and the given templates. Failures
/// are logged and reported as `false`; they never abort the caller.
pub fn record_install(root: &Path, version: &str, templates: &[&TemplateDescriptor]) -> bool {
    let manifest = Manifest {
        installed_version: version.to_string(),
        last_updated: Some(Utc::now()),
        installed_templates: templates.iter().map(|t| ManifestEntry::from(*t)).collect(),
    };
    let result = serde_json::to_string_pretty(&manifest)
        .map_err(crate::ClaudioError::from)
        .and_then(|json| crate::io::atomic_write(&paths::manifest_path(root), json.as_bytes()));
    match result {
        Ok(()) => {
            tracing::debug!(version, templates = manifest.installed_templates.len(), "recorded install");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not write version manifest");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Version check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionCheck {
    pub has_update: bool,
    pub installed_version: String,
    pub packaged_version: String,
}

/// Plain string inequality: any difference, including a downgrade, counts
/// as an update.
pub fn check_for_updates(installed: &str, packaged: &str) -> VersionCheck {
    VersionCheck {
        has_update: installed != packaged,
        installed_version: installed.to_string(),
        packaged_version: packaged.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateSource;
    use tempfile::TempDir;

    #[test]
    fn missing_manifest_is_unversioned() {
        let dir = TempDir::new().unwrap();
        assert_eq!(installed_version(dir.path()), "0.0.0");
    }

    #[test]
    fn malformed_manifest_is_unversioned() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        std::fs::write(dir.path().join(".claude/.version.json"), "{ not json").unwrap();
        assert_eq!(installed_version(dir.path()), "0.0.0");
    }

    #[test]
    fn version_only_manifest_keeps_its_version() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        std::fs::write(dir.path().join(".claude/.version.json"), r#"{"version": "1.2.0"}"#)
            .unwrap();
        assert_eq!(installed_version(dir.path()), "1.2.0");
        let manifest = read_manifest(dir.path()).unwrap();
        assert!(manifest.last_updated.is_none());
        assert!(manifest.installed_templates.is_empty());
    }

    #[test]
    fn record_then_read() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        let templates = TemplateSource::Embedded.scan().unwrap();
        let refs: Vec<&TemplateDescriptor> = templates.iter().take(2).collect();

        assert!(record_install(dir.path(), "1.4.0", &refs));
        let manifest = read_manifest(dir.path()).unwrap();
        assert_eq!(manifest.installed_version, "1.4.0");
        assert!(manifest.last_updated.is_some());
        assert_eq!(manifest.installed_templates.len(), 2);
        assert_eq!(manifest.installed_templates[0].path, refs[0].installed_relative_path());

        let raw = std::fs::read_to_string(dir.path().join(".claude/.version.json")).unwrap();
        assert!(raw.contains("\"lastUpdated\""));
        assert!(raw.contains("\"templates\""));
    }

    #[test]
    fn record_into_missing_dir_does_not_panic() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".claude"), "a file, not a dir").unwrap();
        assert!(!record_install(dir.path(), "1.0.0", &[]));
    }

    #[test]
    fn version_check_is_string_inequality() {
        assert!(!check_for_updates("1.2.0", "1.2.0").has_update);
        assert!(check_for_updates("0.0.0", "1.2.0").has_update);
        assert!(check_for_updates("2.0.0", "1.2.0").has_update);
    }
}
