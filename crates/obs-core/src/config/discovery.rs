//! Locating an Obsidian vault on disk

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Environment variable consulted when no vault can be discovered
pub const VAULTS_PATH_ENV: &str = "OBSIDIAN_VAULTS_PATH";

/// Marker directory Obsidian keeps at the top of every vault
const OBSIDIAN_DIR: &str = ".obsidian";

/// How deep below the search root vaults are looked for
const DISCOVERY_DEPTH: usize = 5;

/// Directories never worth descending into
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "Library"];

/// Find the first vault below `search_root`, returning the vault directory
/// (the parent of its `.obsidian` folder).
///
/// Entries are visited in name order so the result is stable across runs.
pub fn find_obsidian_vault(search_root: &Path) -> Option<PathBuf> {
    debug!("Searching for an Obsidian vault under {}", search_root.display());

    WalkDir::new(search_root)
        .max_depth(DISCOVERY_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(should_descend)
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == OBSIDIAN_DIR)
        .and_then(|entry| entry.path().parent().map(Path::to_path_buf))
}

fn should_descend(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name == OBSIDIAN_DIR {
        return true;
    }
    !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_nested_vault() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join("Documents/Obsidian/notes/.obsidian")).unwrap();

        let found = find_obsidian_vault(home.path()).unwrap();
        assert_eq!(found, home.path().join("Documents/Obsidian/notes"));
    }

    #[test]
    fn test_skips_hidden_directories() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".trash/old/.obsidian")).unwrap();

        assert!(find_obsidian_vault(home.path()).is_none());
    }

    #[test]
    fn test_first_vault_in_name_order() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join("b-vault/.obsidian")).unwrap();
        fs::create_dir_all(home.path().join("a-vault/.obsidian")).unwrap();

        let found = find_obsidian_vault(home.path()).unwrap();
        assert_eq!(found, home.path().join("a-vault"));
    }

    #[test]
    fn test_no_vault() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join("projects/rust")).unwrap();
        assert!(find_obsidian_vault(home.path()).is_none());
    }
}
