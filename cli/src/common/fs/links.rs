//! # create-zip Symbolic Link Resolution
//!
//! File: cli/src/common/fs/links.rs
//!
//! ## Overview
//!
//! This module decides, for a single filesystem entry, whether it is a symbolic
//! link and, if so, where it really points. The archive engine calls `resolve`
//! for every node it visits.
//!
//! ## Architecture
//!
//! - The entry is inspected with `symlink_metadata`, which does not follow links.
//! - A link is dereferenced with `canonicalize`, which walks the whole chain of
//!   intermediate links and fails on broken or cyclic chains.
//! - Anything that is not a link comes back unchanged.
//!
//! The caller keeps both paths: archive *content* is read from `resolved_path`,
//! while the archive *name* is always derived from the original path. Naming from
//! the resolved path corrupts the directory structure whenever a link points
//! outside the source tree.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::links;
//! use std::path::Path;
//!
//! # fn run() -> crate::core::error::ArchiveResult<()> {
//! let resolved = links::resolve(Path::new("proj/link.txt"))?;
//! if resolved.is_symlink {
//!     println!("content comes from {}", resolved.resolved_path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{ArchiveError, ArchiveResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of resolving one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// `true` if the entry itself is a symbolic link.
    pub is_symlink: bool,
    /// Fully dereferenced location for links, the input path otherwise.
    pub resolved_path: PathBuf,
}

/// Resolves `path` to the location its content should be read from.
///
/// # Errors
///
/// - `ArchiveError::Stat` if the entry cannot be inspected at all.
/// - `ArchiveError::SymlinkResolution` if the entry is a link whose chain is
///   broken or cyclic.
pub fn resolve(path: &Path) -> ArchiveResult<ResolvedPath> {
    // Inspect the link bit without following it.
    let metadata = fs::symlink_metadata(path).map_err(|source| ArchiveError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.file_type().is_symlink() {
        return Ok(ResolvedPath {
            is_symlink: false,
            resolved_path: path.to_path_buf(),
        });
    }

    let real_path = fs::canonicalize(path).map_err(|source| ArchiveError::SymlinkResolution {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Resolved symlink {:?} -> {:?}", path, real_path);

    Ok(ResolvedPath {
        is_symlink: true,
        resolved_path: real_path,
    })
}
