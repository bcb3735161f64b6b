//! LVCraft CLI

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::GenerateOutcome;

#[derive(Parser)]
#[command(name = "lvcraft")]
#[command(author, version, about = "LVCraft code generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate ui.c and ui.h, keeping code inside USER CODE regions
    Generate {
        /// Project directory, or any path inside it
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Write without asking, even when user code would be lost
        #[arg(short, long)]
        force: bool,
    },

    /// Check USER CODE markers in the existing ui.c
    Check {
        /// Project directory, or any path inside it
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Delete all generated files
    Clean {
        /// Project directory, or any path inside it
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut confirm = output::prompt_yes_no;

    match cli.command {
        Commands::Generate { project, force } => {
            match commands::generate(&project, force, &mut confirm)? {
                GenerateOutcome::Written(files) => {
                    for file in files {
                        println!("{}", file.display());
                    }
                }
                GenerateOutcome::Cancelled => println!("Generation cancelled, nothing written"),
            }
            Ok(())
        }
        Commands::Check { project } => {
            let diagnostics = commands::check(&project)?;
            if diagnostics.is_empty() {
                println!("All USER CODE markers are balanced");
                return Ok(());
            }
            for d in &diagnostics {
                println!("{d}");
            }
            bail!("{} malformed USER CODE marker(s)", diagnostics.len())
        }
        Commands::Clean { project, yes } => {
            if !commands::clean(&project, yes, &mut confirm)? {
                println!("Nothing to clean");
            }
            Ok(())
        }
    }
}
