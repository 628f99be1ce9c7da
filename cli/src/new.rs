//! `cardpath new`: write an empty story.

use anyhow::{Context, Result};
use cardpath_core::Story;
use std::path::Path;

pub fn run_new_command(path: &Path, name: &str, force: bool) -> Result<Story> {
    if name.trim().is_empty() {
        anyhow::bail!("Story name cannot be empty");
    }
    if path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
    }

    let story = Story::new(name);
    let json = serde_json::to_string_pretty(&story).context("Failed to serialize story")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(story = %story.id, path = %path.display(), "Created story");
    Ok(story)
}
