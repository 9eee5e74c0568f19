//! # create-zip Archive Engine (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module is the archive-assembly engine: it packages a single file or a
//! directory subtree into one ZIP file, preserving the relative directory
//! structure and reading symbolic links through to their real targets.
//!
//! ## Architecture
//!
//! Data flows strictly downward, one node at a time:
//!
//! - **`walk`**: Pre-order, sorted traversal producing `VisitedNode` values. Each
//!   node has already been through the symlink resolver (`common::fs::links`).
//! - **`naming`**: `TraversalContext`, computed once per run, maps a node's
//!   original path to its archive entry name.
//! - **`writer`**: Drives the traversal, writes one entry per node and streams
//!   file content. Exposes `archive` and `archive_with_progress`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive;
//! use std::path::Path;
//!
//! # fn run() -> crate::core::error::ArchiveResult<()> {
//! archive::archive(Path::new("proj"), Path::new("out.zip"))?;
//! # Ok(())
//! # }
//! ```
//!

pub mod naming;
pub mod walk;
pub mod writer;

pub use writer::archive;
