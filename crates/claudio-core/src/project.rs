//! What we can learn about the host project from its files: the values used
//! for template placeholders and the technology flags used to suggest epics.

use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Dependency name → framework label. First match wins.
pub const FRAMEWORKS: &[(&str, &str)] = &[
    ("react", "React"),
    ("vue", "Vue"),
    ("angular", "Angular"),
    ("svelte", "Svelte"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("nestjs", "NestJS"),
];

pub const DEFAULT_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// PackageManifest
// ---------------------------------------------------------------------------

/// The subset of `package.json` we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    /// Read `package.json` under `root`. A missing or unparsable file is
    /// treated as absent; the parse failure is logged.
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join(paths::PACKAGE_JSON);
        let data = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&data) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable package.json");
                None
            }
        }
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

pub fn detect_framework(manifest: Option<&PackageManifest>) -> &'static str {
    let Some(manifest) = manifest else {
        return "Unknown";
    };
    FRAMEWORKS
        .iter()
        .find(|(dep, _)| manifest.has_dependency(dep))
        .map(|(_, label)| *label)
        .unwrap_or("Node.js")
}

pub fn detect_package_manager(root: &Path) -> &'static str {
    if root.join(paths::NPM_LOCKFILE).exists() {
        "npm"
    } else if root.join(paths::YARN_LOCKFILE).exists() {
        "yarn"
    } else {
        "npm"
    }
}

// ---------------------------------------------------------------------------
// ProjectContext / substitution
// ---------------------------------------------------------------------------

/// Resolved values for the template placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    pub project_name: String,
    pub framework: String,
    pub version: String,
    pub package_manager: String,
}

impl ProjectContext {
    pub fn detect(root: &Path) -> Self {
        let project_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        let manifest = PackageManifest::load(root);
        let version = manifest
            .as_ref()
            .and_then(|m| m.version.clone())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        Self {
            project_name,
            framework: detect_framework(manifest.as_ref()).to_string(),
            version,
            package_manager: detect_package_manager(root).to_string(),
        }
    }

    fn replacements(&self) -> [(&'static str, &str); 4] {
        [
            ("{{PROJECT_NAME}}", self.project_name.as_str()),
            ("{{FRAMEWORK}}", self.framework.as_str()),
            ("{{VERSION}}", self.version.as_str()),
            ("{{PACKAGE_MANAGER}}", self.package_manager.as_str()),
        ]
    }
}

/// Replace every known placeholder in `content`. Placeholders are literal
/// and case-sensitive; unknown `{{...}}` markers are left alone.
pub fn substitute(content: &str, ctx: &ProjectContext) -> String {
    ctx.replacements()
        .iter()
        .fold(content.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder, value)
        })
}

// ---------------------------------------------------------------------------
// TechStack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TechStack {
    pub frontend: bool,
    pub backend: bool,
    pub database: bool,
    pub api: bool,
    pub testing: bool,
    pub deployment: bool,
}

impl TechStack {
    pub fn detect(root: &Path) -> Self {
        let mut tech = TechStack::default();
        let has_file = |name: &str| root.join(name).exists();

        if let Some(m) = PackageManifest::load(root) {
            let any = |deps: &[&str]| deps.iter().any(|d| m.has_dependency(d));
            tech.frontend = any(&["react", "vue", "angular", "svelte"]);
            tech.backend = any(&["express", "fastify", "koa", "nestjs"]);
            tech.database = any(&["mongoose", "prisma", "typeorm", "sequelize"]);
            tech.api = any(&["axios", "graphql", "@apollo/client"]);
            tech.testing = any(&["jest", "cypress", "vitest", "playwright"]);
            tech.deployment =
                any(&["docker"]) || has_file("Dockerfile") || has_file("docker-compose.yml");
        }

        if ["Cargo.toml", "requirements.txt", "setup.py", "go.mod"]
            .iter()
            .any(|f| has_file(f))
        {
            tech.backend = true;
        }
        if has_file(".github") || has_file(".gitlab-ci.yml") {
            tech.deployment = true;
        }
        tech
    }

    /// `(label, detected)` pairs in display order.
    pub fn flags(&self) -> [(&'static str, bool); 6] {
        [
            ("Frontend", self.frontend),
            ("Backend", self.backend),
            ("Database", self.database),
            ("Api", self.api),
            ("Testing", self.testing),
            ("Deployment", self.deployment),
        ]
    }

    /// Epics suggested for the detected stack, followed by the ones every
    /// project gets.
    pub fn suggested_epics(&self) -> Vec<&'static str> {
        let mut epics = Vec::new();
        if self.frontend {
            epics.push("EPIC-FRONTEND: User Interface Development");
        }
        if self.backend {
            epics.push("EPIC-BACKEND: Server-side Development");
        }
        if self.database {
            epics.push("EPIC-DATABASE: Data Management");
        }
        if self.api {
            epics.push("EPIC-API: API Development");
        }
        if self.testing {
            epics.push("EPIC-TESTING: Quality Assurance");
        }
        if self.deployment {
            epics.push("EPIC-DEPLOYMENT: DevOps & Infrastructure");
        }
        epics.push("EPIC-PERFORMANCE: Optimization");
        epics.push("EPIC-SECURITY: Security Implementation");
        epics.push("EPIC-DOCS: Documentation");
        epics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
