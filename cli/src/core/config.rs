//! # create-zip Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module resolves the two inputs of a run, the source path and the target
//! archive path, from command-line arguments, environment variables and TOML
//! configuration files, then validates them.
//!
//! ## Architecture
//!
//! Configuration sources (highest precedence first):
//! 1. Command-line arguments, or the `source_path` / `target_dir` environment
//!    variables (handled by clap in the `create` command).
//! 2. Project-specific `.create-zip.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`).
//! 3. User-specific `config.toml` in the platform config directory.
//!
//! Passing `--config <FILE>` replaces steps 2 and 3 with that one file.
//!
//! Each layer is a `FileConfig` whose fields are all optional; layers are merged
//! field by field, `~` is expanded, and the result is validated into a `Config`.
//!
//! ## Examples
//!
//! ```toml
//! # .create-zip.toml
//! source_path = "./build/output"
//! target_dir = "~/artifacts/app"
//! ```
//!
//! ```rust
//! let cfg = config::load_config(cli_layer, None)?;
//! println!("{} -> {}", cfg.source_path.display(), cfg.target_dir.display());
//! ```
//!
use crate::core::error::{CreateZipError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the project configuration file searched for from the current directory upward.
pub const PROJECT_CONFIG_FILENAME: &str = ".create-zip.toml";

/// One configuration layer. Every field is optional so layers can be merged.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct FileConfig {
    /// File or directory to archive.
    pub source_path: Option<String>,
    /// Destination archive path; `.zip` is appended later if missing.
    pub target_dir: Option<String>,
}

/// Validated inputs for one archive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source_path: PathBuf,
    pub target_dir: PathBuf,
}

/// Loads, merges, expands and validates the configuration.
///
/// `cli` holds the values from arguments/environment; `explicit_file` is the
/// `--config` path, if any.
pub fn load_config(cli: FileConfig, explicit_file: Option<&Path>) -> Result<Config> {
    let file_layer = match explicit_file {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            let project_config = load_project_config(&current_dir)?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    let mut merged = merge_configs(file_layer, Some(cli));
    expand_config_paths(&mut merged);
    debug!("Final loaded configuration: {:?}", merged);
    validate_config(&merged).context("Configuration validation failed")
}

fn load_user_config() -> Result<Option<FileConfig>> {
    if let Some(proj_dirs) = ProjectDirs::from("io", "create-zip", "create-zip") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start: &Path) -> Result<Option<FileConfig>> {
    if let Some(project_config_path) = find_project_config_path(start) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Overlays `overlay` onto `base`, field by field.
fn merge_configs(base: FileConfig, overlay: Option<FileConfig>) -> FileConfig {
    let Some(overlay) = overlay else {
        return base;
    };
    FileConfig {
        source_path: overlay.source_path.or(base.source_path),
        target_dir: overlay.target_dir.or(base.target_dir),
    }
}

fn expand_config_paths(config: &mut FileConfig) {
    for value in [&mut config.source_path, &mut config.target_dir]
        .into_iter()
        .flatten()
    {
        *value = shellexpand::tilde(value.as_str()).into_owned();
    }
}

fn validate_config(config: &FileConfig) -> Result<Config> {
    let source_path = non_empty(config.source_path.as_deref(), "SourcePath")?;
    let target_dir = non_empty(config.target_dir.as_deref(), "TargetDir")?;

    let source = PathBuf::from(source_path);
    if !source.exists() {
        return Err(anyhow!(CreateZipError::Config(format!(
            "issue with input SourcePath: path does not exist: {}",
            source.display()
        ))));
    }

    Ok(Config {
        source_path: source,
        target_dir: PathBuf::from(target_dir),
    })
}

fn non_empty<'a>(value: Option<&'a str>, input: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!(CreateZipError::Config(format!(
            "issue with input {input}: parameter not specified"
        )))),
    }
}
