//! Lazy traversal of a source tree.
//!
//! [`TreeWalker`] yields every entry below a root (the root included),
//! depth-first, as [`TreeEntry`] values. Space accounting and archive
//! encoding each consume their own walk; calling [`TreeWalker::entries`]
//! again restarts the traversal.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Kind of a filesystem entry, without following symbolic links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }
}

/// One entry of the source tree
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Path on disk
    pub path: PathBuf,

    /// Path relative to the walk root; empty for the root itself
    pub relative: PathBuf,

    pub kind: EntryKind,

    /// Metadata of the entry itself (links are not followed)
    pub metadata: Metadata,
}

impl TreeEntry {
    /// Whether this entry is the walk root
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Size in bytes of a regular file, zero for anything else
    pub fn file_size(&self) -> u64 {
        match self.kind {
            EntryKind::File => self.metadata.len(),
            _ => 0,
        }
    }
}

/// Restartable walk over a directory tree
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh traversal
    pub fn entries(&self) -> TreeEntries {
        TreeEntries {
            root: self.root.clone(),
            inner: WalkDir::new(&self.root).follow_links(false).into_iter(),
        }
    }
}

/// Iterator returned by [`TreeWalker::entries`]
pub struct TreeEntries {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Iterator for TreeEntries {
    type Item = io::Result<TreeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(io::Error::from(e))),
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => return Some(Err(io::Error::from(e))),
        };

        let relative = match entry.path().strip_prefix(&self.root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => {
                return Some(Err(io::Error::other(format!(
                    "{} is outside of {}",
                    entry.path().display(),
                    self.root.display()
                ))))
            }
        };

        Some(Ok(TreeEntry {
            kind: EntryKind::from_metadata(&metadata),
            path: entry.into_path(),
            relative,
            metadata,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sub/deeper")).unwrap();
        fs::write(temp.path().join("a.txt"), "abc").unwrap();
        fs::write(temp.path().join("sub/b.txt"), "1234567").unwrap();
        fs::write(temp.path().join("sub/deeper/c.md"), "").unwrap();
        temp
    }

    #[test]
    fn test_visits_root_and_every_entry_once() {
        let temp = sample_tree();
        let walker = TreeWalker::new(temp.path());

        let mut relatives: Vec<PathBuf> = walker
            .entries()
            .map(|e| e.unwrap().relative)
            .collect();
        relatives.sort();

        assert_eq!(
            relatives,
            vec![
                PathBuf::new(),
                PathBuf::from("a.txt"),
                PathBuf::from("sub"),
                PathBuf::from("sub/b.txt"),
                PathBuf::from("sub/deeper"),
                PathBuf::from("sub/deeper/c.md"),
            ]
        );
    }

    #[test]
    fn test_root_entry_comes_first() {
        let temp = sample_tree();
        let first = TreeWalker::new(temp.path()).entries().next().unwrap().unwrap();
        assert!(first.is_root());
        assert_eq!(first.kind, EntryKind::Directory);
    }

    #[test]
    fn test_walk_is_restartable() {
        let temp = sample_tree();
        let walker = TreeWalker::new(temp.path());
        let first = walker.entries().count();
        let second = walker.entries().count();
        assert_eq!(first, 6);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_yields_error() {
        let temp = TempDir::new().unwrap();
        let mut entries = TreeWalker::new(temp.path().join("absent")).entries();
        assert!(entries.next().unwrap().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp = sample_tree();
        std::os::unix::fs::symlink(temp.path().join("a.txt"), temp.path().join("link")).unwrap();

        let link = TreeWalker::new(temp.path())
            .entries()
            .map(|e| e.unwrap())
            .find(|e| e.relative == Path::new("link"))
            .unwrap();
        assert_eq!(link.kind, EntryKind::Symlink);
        assert_eq!(link.file_size(), 0);
    }
}
