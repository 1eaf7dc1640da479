//! Template reconciliation: classify shipped templates against a workspace,
//! write what the policy allows, then record the result in the version
//! manifest.
//!
//! The three steps are separate so the interactive `update` command can show
//! the classification and ask before anything is written. [`reconcile`]
//! chains them for callers that do not need to stop in between.

pub mod apply;
pub mod diff;
pub mod manifest;

pub use apply::{apply, backup_file, ApplyReport, FailedEntry, ReportEntry, UpdatePolicy};
pub use diff::{classify, diff, ClassifiedUpdate, InstalledFile, UpdateKind};
pub use manifest::{
    check_for_updates, installed_version, read_manifest, record_install, Manifest, ManifestEntry,
    VersionCheck, UNVERSIONED,
};

use crate::error::Result;
use crate::project::ProjectContext;
use crate::templates::{TemplateDescriptor, TemplateSource};
use std::path::Path;

/// Templates whose target exists on disk after an apply pass, in
/// classification order.
pub fn present_templates(updates: &[ClassifiedUpdate]) -> Vec<&TemplateDescriptor> {
    updates
        .iter()
        .filter(|u| u.target().is_file())
        .map(|u| u.template())
        .collect()
}

/// Apply `updates` and record the manifest, even when some items failed.
pub fn apply_and_record(
    root: &Path,
    updates: &[ClassifiedUpdate],
    policy: &UpdatePolicy,
    version: &str,
) -> Result<ApplyReport> {
    let ctx = ProjectContext::detect(root);
    let report = apply(updates, policy, &ctx)?;
    record_install(root, version, &present_templates(updates));
    Ok(report)
}

/// Diff, apply and record in one pass.
pub fn reconcile(
    source: &TemplateSource,
    root: &Path,
    policy: &UpdatePolicy,
    version: &str,
) -> Result<ApplyReport> {
    policy.validate()?;
    let updates = diff(source, root)?;
    apply_and_record(root, &updates, policy, version)
}
