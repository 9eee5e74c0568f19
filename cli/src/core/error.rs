//! # create-zip Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout create-zip. There are two
//! layers:
//!
//! - `ArchiveError`: The typed failure taxonomy of the archive-assembly engine
//!   (`common::archive`). Every variant names the offending path so the message can
//!   be shown to an end user as-is.
//! - `CreateZipError`: Application-level failures (bad configuration, filesystem
//!   pre-flight problems), plus a transparent wrapper around `ArchiveError`.
//!
//! The command layer works with `Result<T>`, an alias for `anyhow::Result<T>`, so
//! that context can be attached freely. The engine returns `ArchiveResult<T>` so
//! callers can match on the exact failure.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type from command code
//! if source.is_empty() {
//!     return Err(CreateZipError::Config("source_path must not be empty".into()))?;
//! }
//!
//! // Pattern matching on engine failures
//! match archive::archive(&source, &target) {
//!     Err(ArchiveError::Naming { path, .. }) => eprintln!("cannot name {}", path.display()),
//!     other => other?,
//! }
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the archive-assembly engine.
///
/// Any of these aborts the remainder of an `archive()` call.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A path could not be inspected (missing, permission denied, concurrent deletion).
    #[error("Failed to inspect '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A symbolic link is broken or part of a cycle.
    #[error("Failed to resolve symbolic link '{}': {source}", .path.display())]
    SymlinkResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No archive-relative name could be computed for the path.
    #[error("Cannot compute archive entry name for '{}': {reason}", .path.display())]
    Naming { path: PathBuf, reason: String },

    /// The output archive file could not be created.
    #[error("Failed to create archive '{}': {source}", .path.display())]
    DestinationOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Finalizing the archive (central directory, flush) failed.
    #[error("Failed to finalize archive '{}': {source}", .path.display())]
    DestinationClose {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A source file's bytes could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    ContentRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry (header or data) could not be written into the archive.
    #[error("Failed to write archive entry for '{}': {source}", .path.display())]
    ContentWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Application-level error type for create-zip.
#[derive(Error, Debug)]
pub enum CreateZipError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Type alias for Result using anyhow::Error for the command layer.
pub type Result<T> = anyhow::Result<T>;

/// Result type returned by the archive engine.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
