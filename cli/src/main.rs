//! # create-zip Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the create-zip CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the create command and turning failures into an exit status
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! create-zip --help
//!
//! # Archive a directory with per-entry logging
//! create-zip -vv ./proj ./out/proj
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args (and `source_path` / `target_dir` env vars) via Clap
//! 2. Configure logging based on verbosity level
//! 3. Run `commands::create::handle_create`
//! 4. Print any error and exit with status 1
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Command handlers
mod common; // Archive engine and filesystem helpers
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "create-zip",
    about = "Package a file or directory into a ZIP archive",
    long_about = "Package a file or directory tree into a single ZIP archive.\n\
                  Directory structure is preserved and symbolic links are archived\n\
                  with the content of their targets.",
    version
)]
struct Cli {
    #[command(flatten)]
    create: commands::create::CreateArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::create::handle_create(cli.create) {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
