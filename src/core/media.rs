use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::error::{ExportError, Result};
use super::paths::strip_extension;

/// Copy every file under `source_root` whose extension-less name is in
/// `names` into `dest_dir`, keeping the original file name.
///
/// Files with the same name in different subdirectories land on the same
/// destination; the one walked last wins. The first walk or copy error
/// stops the pass. Returns the number of files copied.
///
/// `dest_dir` is never walked, even when it lies under `source_root`, so a
/// file is never copied onto itself. Symlinks are not followed while
/// walking but a symlinked file is copied like a regular one.
pub fn collect_media(source_root: &Path, dest_dir: &Path, names: &HashSet<String>) -> Result<usize> {
    fs::create_dir_all(dest_dir).map_err(|e| ExportError::io(dest_dir, e))?;

    if names.is_empty() {
        return Ok(0);
    }

    let dest_real = fs::canonicalize(dest_dir).map_err(|e| ExportError::io(dest_dir, e))?;
    let walker = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_same_dir(e.path(), &dest_real)));

    let mut copied = 0;
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !names.contains(strip_extension(&file_name)) {
            continue;
        }

        let dest = dest_dir.join(entry.file_name());
        fs::copy(entry.path(), &dest).map_err(|e| ExportError::io(entry.path(), e))?;
        debug!("Copied media {}", entry.path().display());
        copied += 1;
    }

    Ok(copied)
}

fn is_same_dir(path: &Path, real: &Path) -> bool {
    fs::canonicalize(path).map(|p| p == real).unwrap_or(false)
}
