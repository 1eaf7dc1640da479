use super::load_config;
use crate::output;
use anyhow::Context;
use claudio_core::{tools, ClaudioError};
use std::path::Path;

/// `claudio open`: hand the terminal to the assistant.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let config = load_config(root)?;
    if !tools::assistant_available(&config.assistant) {
        return Err(ClaudioError::AssistantNotFound(config.assistant).into());
    }
    output::section(&format!("🚀 Opening {}...", config.assistant));
    tools::open_assistant(&config.assistant, root)
        .with_context(|| format!("failed to open {}", config.assistant))
}
