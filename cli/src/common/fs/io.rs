//! # create-zip Filesystem Pre-flight Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module holds the small filesystem steps that run *before* the archive
//! engine is invoked. The engine assumes its destination is ready to be created;
//! these helpers make that true and report anything the user should know.
//!
//! ## Architecture
//!
//! - **`with_zip_extension`**: Normalizes the destination path so it ends in `.zip`.
//! - **`ensure_dir_exists`**: Creates a directory (and its parents) when missing,
//!   and rejects paths that exist but are not directories.
//! - **`ensure_parent_dir`**: Applies `ensure_dir_exists` to a destination's parent.
//!   A bare file name has an empty parent, which means the current directory.
//! - **`check_already_exists`**: Logs a warning when the destination archive is
//!   already present. This never stops the run; the engine overwrites the file.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! let target = io::with_zip_extension(Path::new("build/out"));
//! io::ensure_parent_dir(&target)?;
//! io::check_already_exists(&target);
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{CreateZipError, Result}; // Use standard Result and custom Error types
use anyhow::Context; // For adding context to errors
use std::ffi::OsString;
use std::fs; // Standard filesystem module
use std::path::{Path, PathBuf}; // Filesystem path types
use tracing::{debug, info, warn}; // Logging utilities

/// Suffix every produced archive carries.
pub const ZIP_EXTENSION: &str = ".zip";

/// Returns `target` with `.zip` appended, unless it already ends with `.zip`.
///
/// The check is a plain, case-sensitive suffix test on the path text, so
/// `out.ZIP` becomes `out.ZIP.zip`.
pub fn with_zip_extension(target: &Path) -> PathBuf {
    if target.as_os_str().to_string_lossy().ends_with(ZIP_EXTENSION) {
        return target.to_path_buf();
    }
    let mut with_suffix: OsString = target.as_os_str().to_os_string();
    with_suffix.push(ZIP_EXTENSION);
    PathBuf::from(with_suffix)
}

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function attempts to create the directory,
/// including any necessary parent directories (similar to `mkdir -p`).
/// If the path already exists but is not a directory (e.g., it's a file),
/// an error (`CreateZipError::FileSystem`) is returned.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    // Check if the path exists in the filesystem.
    if !path.exists() {
        // Path does not exist, attempt to create it recursively.
        fs::create_dir_all(path)
            // Add context to any error occurring during directory creation.
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    }
    // Path exists, check if it's actually a directory.
    else if !path.is_dir() {
        anyhow::bail!(CreateZipError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Makes sure the directory that will hold `target` exists.
///
/// # Errors
///
/// Propagates any failure from `ensure_dir_exists`.
pub fn ensure_parent_dir(target: &Path) -> Result<()> {
    match target.parent() {
        // `Path::new("out.zip").parent()` is `Some("")`: the current directory.
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

/// Warns if something already exists at `target`. Returns whether it did.
///
/// This is informational only; the caller proceeds and the archive is overwritten.
pub fn check_already_exists(target: &Path) -> bool {
    if target.symlink_metadata().is_err() {
        return false;
    }
    let target_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.display().to_string());
    warn!(
        "The {} already exists at location: {}",
        target_name,
        target.display()
    );
    true
}
