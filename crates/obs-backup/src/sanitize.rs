//! Archive entry naming.
//!
//! Base names are cleaned of characters that removable media filesystems
//! (FAT, exFAT, NTFS) reject. Directory components are kept as they are.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Characters replaced in base names
pub const FORBIDDEN_CHARS: &[char] = &['?', '*', '<', '>', '"', '\''];

/// Replacement for every forbidden character
pub const REPLACEMENT: char = '-';

/// Name of the archive entry recorded for the source root
pub const ROOT_ENTRY: &str = ".";

/// Replace every forbidden character in `name` with `-`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { REPLACEMENT } else { c })
        .collect()
}

/// Same replacement on a raw OS name.
///
/// The forbidden characters are all ASCII, so on Unix the name is rewritten
/// byte by byte and names that are not valid UTF-8 keep their other bytes.
pub fn sanitize_os_name(name: &OsStr) -> OsString {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let bytes = name
            .as_bytes()
            .iter()
            .map(|&b| {
                if b.is_ascii() && FORBIDDEN_CHARS.contains(&char::from(b)) {
                    REPLACEMENT as u8
                } else {
                    b
                }
            })
            .collect();
        OsString::from_vec(bytes)
    }

    #[cfg(not(unix))]
    {
        match name.to_str() {
            Some(s) => OsString::from(sanitize_file_name(s)),
            None => name.to_os_string(),
        }
    }
}

/// Archive entry path for a path relative to the source root.
///
/// Only the last component is sanitized; names are kept as raw OS strings
/// so distinct files never collapse into one entry. The empty path (the
/// root itself) maps to `.`.
pub fn archive_entry_name(relative: &Path) -> PathBuf {
    let parts: Vec<&OsStr> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    match parts.split_last() {
        None => PathBuf::from(ROOT_ENTRY),
        Some((base, dirs)) => {
            let mut name: PathBuf = dirs.iter().collect();
            name.push(sanitize_os_name(base));
            name
        }
    }
}
