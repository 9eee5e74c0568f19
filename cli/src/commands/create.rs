//! # create-zip Create Command
//!
//! File: cli/src/commands/create.rs
//!
//! ## Overview
//!
//! This module implements the single operation of the tool: package a source
//! path into a ZIP archive at a target path. It wraps the archive engine with
//! everything the engine expects to have been done already.
//!
//! ## Architecture
//!
//! The command processing flow:
//! 1. Resolve and validate `source_path` / `target_dir` (`core::config`).
//! 2. Print the effective configuration.
//! 3. Normalize the target to end in `.zip`, create its parent directory, and
//!    warn if an archive is already there (`common::fs::io`).
//! 4. Run the engine (`common::archive::archive`), which logs each entry.
//! 5. Print the path of the written archive on stdout.
//!
//! ## Examples
//!
//! ```bash
//! # Archive a directory; writes ./out.zip containing proj/...
//! create-zip ./proj out
//!
//! # CI-step style: inputs from the environment
//! source_path=./build target_dir=./deploy/app create-zip
//! ```
//!
use crate::common::archive;
use crate::common::fs::io;
use crate::core::config::{self, Config, FileConfig};
use crate::core::error::{CreateZipError, Result};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for creating an archive.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// File or directory to archive.
    #[arg(env = "source_path")]
    pub source_path: Option<String>,

    /// Path of the archive to write. `.zip` is appended when missing.
    #[arg(env = "target_dir")]
    pub target_dir: Option<String>,

    /// Read settings from this TOML file instead of searching for `.create-zip.toml`.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// # Handle Create Command (`handle_create`)
///
/// Runs one archive operation end to end.
///
/// ## Errors
///
/// Returns an error if configuration is missing or invalid, the target's parent
/// directory cannot be created, or the archive engine fails. Engine failures are
/// wrapped in `CreateZipError::Archive`.
pub fn handle_create(args: CreateArgs) -> Result<()> {
    debug!("Handling create command with args: {:?}", args);

    let cli_layer = FileConfig {
        source_path: args.source_path,
        target_dir: args.target_dir,
    };
    let cfg = config::load_config(cli_layer, args.config.as_deref())
        .context("Issue with input")?;
    print_config(&cfg);

    let target = io::with_zip_extension(&cfg.target_dir);
    io::ensure_parent_dir(&target)?;
    io::check_already_exists(&target);

    archive::archive(&cfg.source_path, &target)
        .map_err(CreateZipError::from)
        .context("Issue with compress")?;

    println!("{}", target.display());
    Ok(())
}

fn print_config(cfg: &Config) {
    info!("Create ZIP configs:");
    info!("- SourcePath: {}", cfg.source_path.display());
    info!("- TargetDir: {}", cfg.target_dir.display());
}
