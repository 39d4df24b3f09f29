use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ExportError, Result};

/// Staging tree for one export run.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub root: PathBuf,
    pub notes: PathBuf,
    pub media: PathBuf,
}

impl ExportPaths {
    pub fn new(root: &Path, notes_dir: &str, media_dir: &str) -> Self {
        Self {
            notes: root.join(notes_dir),
            media: root.join(media_dir),
            root: root.to_path_buf(),
        }
    }

    /// Create the notes and media directories.
    pub fn prepare(&self) -> Result<()> {
        for dir in [&self.notes, &self.media] {
            fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;
        }
        Ok(())
    }

    /// True when the staging root exists and already has entries in it.
    pub fn is_occupied(&self) -> bool {
        fs::read_dir(&self.root)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Destination of a copied note: `<notes>/<logical name>.md`.
    pub fn note_destination(&self, name: &str) -> PathBuf {
        self.notes.join(format!("{}.md", name))
    }

    pub fn remove(&self) -> Result<()> {
        fs::remove_dir_all(&self.root).map_err(|e| ExportError::io(&self.root, e))
    }
}

/// Strip the extension from the last path segment of `name`.
///
/// The extension starts at the final `.` after the last `/`, so
/// `notes/v1.2` loses `.2` and `archive.tar.gz` keeps `archive.tar`.
pub fn strip_extension(name: &str) -> &str {
    let segment_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[segment_start..].rfind('.') {
        Some(dot) => &name[..segment_start + dot],
        None => name,
    }
}

/// Extension of the last path segment, including the leading dot.
pub fn extension(name: &str) -> &str {
    &name[strip_extension(name).len()..]
}
