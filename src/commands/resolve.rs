use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use vault_export::core::config::ExportConfig;
use vault_export::core::resolver::resolve_note;

pub fn run(config_path: &Path, name: &str) -> Result<()> {
    let config = ExportConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    match resolve_note(&config.files_paths, name) {
        Some(path) => {
            println!("{} {} -> {}", "✓".green(), name.cyan(), path.display());
            Ok(())
        }
        None => {
            println!("{}", format!("Note '{}' not found.", name).red());
            std::process::exit(1);
        }
    }
}
