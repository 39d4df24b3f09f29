mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::run::RunOptions;

#[derive(Parser)]
#[command(name = "vault-export")]
#[command(about = "Export a note with its linked notes and media as a zip archive", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, global = true, help = "Debug logging")]
    verbose: bool,
    #[arg(short, long, global = true, conflicts_with = "verbose", help = "Only log warnings and errors")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the configured note and everything it links to
    #[command(alias = "r")]
    Run {
        #[arg(long, help = "Path to the YAML config")]
        config: PathBuf,
        #[arg(short, long, help = "Archive path (overrides archivePath)")]
        output: Option<PathBuf>,
        #[arg(long, help = "Nesting limit (overrides levelNesting)")]
        level: Option<usize>,
        #[arg(long, help = "Keep the staging directory after archiving")]
        keep_staging: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show the note links and media embeds found in a file
    Links {
        file: PathBuf,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show which file a note name resolves to
    Resolve {
        #[arg(long, help = "Path to the YAML config")]
        config: PathBuf,
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            config,
            output,
            level,
            keep_staging,
            json,
        } => commands::run::run(
            &config,
            RunOptions {
                output,
                level,
                keep_staging,
                json,
            },
        ),
        Commands::Links { file, json } => commands::links::run(&file, json),
        Commands::Resolve { config, name } => commands::resolve::run(&config, &name),
    }
}
