//! Callouts command

use anyhow::{bail, Context, Result};
use obs_core::snippets::{callouts_snippet_path, ensure_snippet};
use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::load_config;
use crate::output;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    output::header("Edit Obsidian callouts");

    let config = load_config(config_path)?;
    let snippet = callouts_snippet_path(&config.obsidian_dir()?);
    if ensure_snippet(&snippet)? {
        output::info(&format!(
            "Created new callouts file at: {}",
            snippet.display()
        ));
    }

    // `default_editor` may carry arguments, e.g. "code --wait"
    let editor = config.editor();
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(obs_core::types::DEFAULT_EDITOR);
    debug!("Launching {} for {}", program, snippet.display());

    let status = Command::new(program)
        .args(parts)
        .arg(&snippet)
        .status()
        .with_context(|| format!("Failed to open editor '{}'", editor))?;

    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }

    output::success("Callouts file opened successfully!");
    Ok(())
}
