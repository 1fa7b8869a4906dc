//! The CSS snippet holding custom callout styles

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Content of a freshly created snippet
pub const SNIPPET_TEMPLATE: &str = "/* Add your callout styles here */\n";

/// Location of the callouts snippet inside a vault's `.obsidian` directory
pub fn callouts_snippet_path(obsidian_dir: &Path) -> PathBuf {
    obsidian_dir.join("snippets").join("snippet.css")
}

/// Make sure the snippet exists, creating it from [`SNIPPET_TEMPLATE`].
///
/// Returns `true` when the file was created.
pub fn ensure_snippet(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, SNIPPET_TEMPLATE)?;
    info!("Created new callouts file at: {}", path.display());
    Ok(true)
}
