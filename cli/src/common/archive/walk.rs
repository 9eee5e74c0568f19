//! # create-zip Source Traversal (`common::archive::walk`)
//!
//! File: cli/src/common/archive/walk.rs
//!
//! ## Overview
//!
//! Produces the nodes of a source tree as a lazy sequence of `VisitedNode`
//! values. The archive writer simply iterates it; there is no callback and no
//! state shared between nodes.
//!
//! ## Architecture
//!
//! - `walkdir` performs a pre-order, depth-first walk: a directory is yielded
//!   before any of its children.
//! - Siblings are sorted by file name so two runs over the same tree yield the
//!   same order.
//! - Links are not followed by the walk itself. Each node is passed through
//!   `links::resolve`, which reports where its content really lives. A link to a
//!   directory therefore shows up as one directory node and is not descended into.
//! - The source root is always followed, so a source given as a link to a
//!   directory is archived like the directory itself.
//!
use crate::common::fs::links;
use crate::core::error::{ArchiveError, ArchiveResult};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a visited node turned out to be after link resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
    /// FIFOs, sockets, device nodes. These carry no archivable content.
    Other,
}

/// One step of the traversal.
#[derive(Debug, Clone)]
pub struct VisitedNode {
    /// Where the node sits in the source tree. Entry names come from this.
    pub original_path: PathBuf,
    /// Where content is read from. Equal to `original_path` unless `is_symlink`.
    pub resolved_path: PathBuf,
    pub is_symlink: bool,
    pub kind: NodeKind,
    /// Metadata of `resolved_path` (the link target for links).
    pub metadata: Metadata,
}

impl VisitedNode {
    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Pre-order iterator over the nodes under a source path.
pub struct Traversal {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

impl Traversal {
    pub fn new(source_path: &Path) -> Self {
        let inner = WalkDir::new(source_path)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter();
        Self {
            root: source_path.to_path_buf(),
            inner,
        }
    }
}

impl Iterator for Traversal {
    type Item = ArchiveResult<VisitedNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.inner.next()? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(walk_error(err, &self.root))),
        };
        Some(visit(entry.path()))
    }
}

/// Resolves one path into a `VisitedNode`.
fn visit(path: &Path) -> ArchiveResult<VisitedNode> {
    let resolved = links::resolve(path)?;
    let metadata = fs::metadata(&resolved.resolved_path).map_err(|source| ArchiveError::Stat {
        path: resolved.resolved_path.clone(),
        source,
    })?;

    let kind = if metadata.is_dir() {
        NodeKind::Directory
    } else if metadata.is_file() {
        NodeKind::File
    } else {
        NodeKind::Other
    };

    Ok(VisitedNode {
        original_path: path.to_path_buf(),
        resolved_path: resolved.resolved_path,
        is_symlink: resolved.is_symlink,
        kind,
        metadata,
    })
}

fn walk_error(err: walkdir::Error, root: &Path) -> ArchiveError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    if err.loop_ancestor().is_some() {
        let message = err.to_string();
        return ArchiveError::SymlinkResolution {
            path,
            source: io::Error::new(io::ErrorKind::Other, message),
        };
    }
    ArchiveError::Stat {
        path,
        source: io::Error::from(err),
    }
}
