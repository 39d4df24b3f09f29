//! Locate a note on disk from its logical name.
//!
//! Link text and filenames can use different Unicode decomposition forms
//! for the same visible string, so both sides are NFC-normalized before
//! comparison.

use std::path::{Path, PathBuf};

use tracing::warn;
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

use super::error::Result;
use super::paths::strip_extension;

/// Search `source_dirs` in order and return the first file whose
/// extension-less name matches `name`.
///
/// A directory that cannot be walked is logged and counts as a miss.
pub fn resolve_note(source_dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    let target = nfc(name);

    for dir in source_dirs {
        match find_in_dir(dir, &target) {
            Ok(Some(path)) => return Some(path),
            Ok(None) => {}
            Err(e) => warn!("Failed to search {} for '{}': {}", dir.display(), name, e),
        }
    }

    None
}

/// Walk one directory tree (entries in file-name order) looking for a file
/// whose normalized stem equals the already-normalized `target`.
///
/// Only the file name is compared, never the path below `dir`. Anything
/// that is not a directory counts as a file, symlinks included.
pub fn find_in_dir(dir: &Path, target: &str) -> Result<Option<PathBuf>> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if nfc(strip_extension(&file_name)) == target {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

fn nfc(s: &str) -> String {
    s.nfc().collect()
}
