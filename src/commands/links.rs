use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use vault_export::core::traversal::read_links;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let links =
        read_links(file).with_context(|| format!("Failed to read {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    println!("{}", "Links".bold());
    println!("{}", "=".repeat(60));
    println!("File: {}", file.display().to_string().cyan());
    println!();

    if links.is_empty() {
        println!("{}", "No links found.".yellow());
        return Ok(());
    }

    println!("Notes ({}):", links.notes.len());
    for name in &links.notes {
        println!("  {} [[{}]]", "•".cyan(), name);
    }
    println!();
    println!("Media ({}):", links.media.len());
    for name in &links.media {
        println!("  {} ![[{}]]", "•".cyan(), name);
    }

    Ok(())
}
