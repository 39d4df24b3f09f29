use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::{ExportError, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: usize,
    pub directories: usize,
}

/// Zip the tree under `source` into `target`.
///
/// Entry names are relative to the parent of `source`, so they all start
/// with the staging directory's own name. Subdirectories get their own
/// entries even when empty; `source` itself does not.
pub fn zip_dir(source: &Path, target: &Path) -> Result<ArchiveStats> {
    let file = File::create(target).map_err(|e| ExportError::io(target, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let base = source.parent().unwrap_or_else(|| Path::new(""));
    let mut stats = ArchiveStats::default();

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path == source {
            continue;
        }

        let name = entry_name(path, base)?;
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
            stats.directories += 1;
            continue;
        }

        zip.start_file(name.as_str(), options)?;
        let mut input = File::open(path).map_err(|e| ExportError::io(path, e))?;
        io::copy(&mut input, &mut zip).map_err(|e| ExportError::io(path, e))?;
        debug!("Archived {}", name);
        stats.files += 1;
    }

    zip.finish()?;
    Ok(stats)
}

/// Zip the staging tree, then delete it.
pub fn archive_and_remove(source: &Path, target: &Path) -> Result<ArchiveStats> {
    let stats = zip_dir(source, target)?;
    fs::remove_dir_all(source).map_err(|e| ExportError::io(source, e))?;
    Ok(stats)
}

/// `/`-separated archive name of `path` relative to `base`.
fn entry_name(path: &Path, base: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(base)
        .map_err(|_| ExportError::StripPrefix {
            path: path.to_path_buf(),
            base: base.to_path_buf(),
        })?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}
