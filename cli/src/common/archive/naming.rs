//! # create-zip Archive Entry Naming (`common::archive::naming`)
//!
//! File: cli/src/common/archive/naming.rs
//!
//! ## Overview
//!
//! Maps filesystem paths to in-archive entry names. The mapping is fixed once per
//! run by a `TraversalContext`, built before the walk begins from the source path
//! and whether it is a directory.
//!
//! ## Naming rules
//!
//! - **Directory source** (`NamingMode::Directory`): every entry is nested under the
//!   directory's own base name. `proj/` holding `sub/b.txt` yields `proj/`,
//!   `proj/sub/` and `proj/sub/b.txt`.
//! - **Single-file source** (`NamingMode::SingleFile`): the archive holds exactly
//!   one entry, named by the file's base name with no directory prefix.
//! - Names always use `/` as the separator, whatever the host uses.
//! - Directory entries end in exactly one `/`.
//! - Names are derived from the *original* (link) path of a node, never from the
//!   dereferenced one.
//!
//! A path that does not lie under the source, or that has a component which is
//! not valid UTF-8, is rejected with `ArchiveError::Naming`.
//!
use crate::core::error::{ArchiveError, ArchiveResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// How entry names are formed for one archive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingMode {
    /// The source is a directory; all names start with `prefix`.
    Directory { prefix: String },
    /// The source is a single file; its only entry is called `file_name`.
    SingleFile { file_name: String },
}

/// Naming state computed once before the traversal and shared by every node.
#[derive(Debug, Clone)]
pub struct TraversalContext {
    source_path: PathBuf,
    mode: NamingMode,
}

impl TraversalContext {
    /// Builds the context for `source_path`.
    ///
    /// `is_directory` comes from the single stat of the source done by the writer.
    ///
    /// # Errors
    ///
    /// `ArchiveError::Naming` if the source has no usable base name (e.g. `/`),
    /// `ArchiveError::Stat` if the path had to be canonicalized to find one and
    /// that failed.
    pub fn new(source_path: &Path, is_directory: bool) -> ArchiveResult<Self> {
        let base_name = base_name(source_path)?;
        let mode = if is_directory {
            NamingMode::Directory { prefix: base_name }
        } else {
            NamingMode::SingleFile {
                file_name: base_name,
            }
        };
        Ok(Self {
            source_path: source_path.to_path_buf(),
            mode,
        })
    }

    /// The source path exactly as given by the caller.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[cfg(test)]
    pub fn mode(&self) -> &NamingMode {
        &self.mode
    }

    /// Computes the archive entry name for a node found at `original_path`.
    ///
    /// # Errors
    ///
    /// `ArchiveError::Naming` if `original_path` is not inside the source or
    /// contains a component that cannot be represented in an entry name.
    pub fn entry_name(&self, original_path: &Path, is_directory: bool) -> ArchiveResult<String> {
        let mut name = match &self.mode {
            NamingMode::SingleFile { file_name } => {
                if original_path != self.source_path {
                    return Err(naming_error(
                        original_path,
                        format!("not the source file '{}'", self.source_path.display()),
                    ));
                }
                file_name.clone()
            }
            NamingMode::Directory { prefix } => {
                let relative = original_path.strip_prefix(&self.source_path).map_err(|_| {
                    naming_error(
                        original_path,
                        format!("outside of the source tree '{}'", self.source_path.display()),
                    )
                })?;
                let mut name = prefix.clone();
                for component in relative.components() {
                    match component {
                        Component::Normal(part) => {
                            let part = part.to_str().ok_or_else(|| {
                                naming_error(original_path, "path is not valid UTF-8")
                            })?;
                            name.push('/');
                            name.push_str(part);
                        }
                        Component::CurDir => {}
                        _ => {
                            return Err(naming_error(
                                original_path,
                                "relative path leaves the source tree",
                            ))
                        }
                    }
                }
                name
            }
        };

        if is_directory {
            name.push('/');
        }
        Ok(name)
    }
}

/// The last path component of `path` as UTF-8.
///
/// Paths such as `.` or `sub/..` have no literal file name, so they are
/// canonicalized first.
fn base_name(path: &Path) -> ArchiveResult<String> {
    let named = match path.file_name() {
        Some(name) => name.to_os_string(),
        None => {
            let canonical = fs::canonicalize(path).map_err(|source| ArchiveError::Stat {
                path: path.to_path_buf(),
                source,
            })?;
            canonical
                .file_name()
                .map(|name| name.to_os_string())
                .ok_or_else(|| naming_error(path, "source has no base name"))?
        }
    };
    named
        .into_string()
        .map_err(|_| naming_error(path, "source base name is not valid UTF-8"))
}

fn naming_error(path: &Path, reason: impl Into<String>) -> ArchiveError {
    ArchiveError::Naming {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
