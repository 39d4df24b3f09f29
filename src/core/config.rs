use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::ConfigError;
use super::paths::ExportPaths;

/// Export settings, read from a YAML file with camelCase keys.
///
/// Relative paths are taken relative to the working directory of the run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Logical name of the note the export starts from.
    pub parse_file_path: String,
    #[serde(default)]
    pub black_list: Vec<String>,
    /// Note directories, searched in order.
    pub files_paths: Vec<PathBuf>,
    pub media_path: PathBuf,
    pub level_nesting: usize,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default = "default_notes_dir")]
    pub notes_dir: String,
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    #[serde(default)]
    pub archive_path: Option<PathBuf>,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("export")
}

fn default_notes_dir() -> String {
    "notes".to_string()
}

fn default_media_dir() -> String {
    "media".to_string()
}

impl ExportConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ExportConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parse_file_path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "parseFilePath must name a note".to_string(),
            ));
        }
        if self.files_paths.is_empty() {
            return Err(ConfigError::Invalid(
                "filesPaths must list at least one directory".to_string(),
            ));
        }
        if self.level_nesting < 1 {
            return Err(ConfigError::Invalid(format!(
                "levelNesting must be at least 1 (got {})",
                self.level_nesting
            )));
        }
        if self.export_dir.as_os_str().is_empty() || self.export_dir == Path::new(".") {
            return Err(ConfigError::Invalid(
                "exportDir must name a dedicated staging directory".to_string(),
            ));
        }
        for (key, value) in [("notesDir", &self.notes_dir), ("mediaDir", &self.media_dir)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }
        if self.notes_dir == self.media_dir {
            return Err(ConfigError::Invalid(format!(
                "notesDir and mediaDir must differ (both are '{}')",
                self.notes_dir
            )));
        }
        if self.archive_path().starts_with(&self.export_dir) {
            return Err(ConfigError::Invalid(format!(
                "archivePath {} must not be inside exportDir {}",
                self.archive_path().display(),
                self.export_dir.display()
            )));
        }
        Ok(())
    }

    /// Staging layout for this run.
    pub fn export_paths(&self) -> ExportPaths {
        ExportPaths::new(&self.export_dir, &self.notes_dir, &self.media_dir)
    }

    /// Where the archive is written: `archivePath`, or the staging
    /// directory's name with a `.zip` suffix next to it.
    pub fn archive_path(&self) -> PathBuf {
        if let Some(path) = &self.archive_path {
            return path.clone();
        }
        let name = self
            .export_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("export");
        match self.export_dir.parent() {
            Some(parent) => parent.join(format!("{}.zip", name)),
            None => PathBuf::from(format!("{}.zip", name)),
        }
    }
}
