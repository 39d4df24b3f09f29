use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::*;
use serde::Serialize;
use tracing::info;

use vault_export::core::archive::{archive_and_remove, zip_dir};
use vault_export::core::config::ExportConfig;
use vault_export::core::traversal::{ExportReport, Traversal};

#[derive(Serialize)]
struct RunSummary {
    archive: String,
    archived_files: usize,
    staging_kept: bool,
    report: ExportReport,
}

pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub level: Option<usize>,
    pub keep_staging: bool,
    pub json: bool,
}

pub fn run(config_path: &Path, options: RunOptions) -> Result<()> {
    let mut config = ExportConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if let Some(output) = options.output {
        config.archive_path = Some(output);
    }
    if let Some(level) = options.level {
        config.level_nesting = level;
    }
    config.validate()?;

    let traversal = Traversal::from_config(&config);
    let paths = traversal.paths();
    if paths.is_occupied() {
        bail!(
            "Export directory {} already exists and is not empty",
            paths.root.display()
        );
    }
    paths
        .prepare()
        .context("Failed to create export directories")?;

    let report = traversal.run();

    let archive = config.archive_path();
    let stats = if options.keep_staging {
        zip_dir(&paths.root, &archive)
    } else {
        archive_and_remove(&paths.root, &archive)
    }
    .with_context(|| format!("Failed to write archive {}", archive.display()))?;
    info!("Archive written to {}", archive.display());

    let summary = RunSummary {
        archive: archive.display().to_string(),
        archived_files: stats.files,
        staging_kept: options.keep_staging,
        report,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let report = &summary.report;

    println!("{}", "Vault Export".bold());
    println!("{}", "=".repeat(60));
    println!("Start note: {}", report.start.cyan());
    println!("Nesting limit: {}", report.max_depth);
    println!();

    if report.exported.is_empty() {
        println!("{}", "No notes were exported.".yellow());
    } else {
        println!("Exported {} notes:", report.exported.len());
        for note in &report.exported {
            println!("  {} {} (level {})", "✓".green(), note.name, note.depth);
        }
    }

    if !report.missing.is_empty() {
        println!();
        println!("{}", "Not found:".yellow().bold());
        for name in &report.missing {
            println!("  {} {}", "✗".yellow(), name);
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("{}", "Failures:".red().bold());
        for failure in &report.failures {
            println!(
                "  {} {}: {} ({})",
                "✗".red(),
                failure.note,
                failure.operation,
                failure.message
            );
        }
    }

    println!();
    println!("{}", "Summary".bold());
    println!("{}", "-".repeat(60));
    println!("  Notes exported: {}", report.exported.len().to_string().green());
    println!("  Media copied: {}", report.media_copied);
    println!(
        "  Missing notes: {}",
        if report.missing.is_empty() {
            "0".green()
        } else {
            report.missing.len().to_string().yellow()
        }
    );
    println!(
        "  Failures: {}",
        if report.failures.is_empty() {
            "0".green()
        } else {
            report.failures.len().to_string().red()
        }
    );
    println!("  Skipped beyond limit: {}", report.pruned);
    println!("  Blacklisted links: {}", report.blacklisted);
    println!();
    println!(
        "{} Archive created: {}",
        "✓".green(),
        summary.archive.bold()
    );
    if summary.staging_kept {
        println!("{}", "Staging directory kept.".dimmed());
    }
}
