//! # create-zip Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!

//! ## Overview
//!
//! This module groups the filesystem helpers used around and inside the archive
//! engine.
//!
//! ## Architecture
//!
//! - **`io`**: Destination pre-flight: `.zip` suffix normalization, parent
//!   directory creation, and the "already exists" warning. Used by the `create` command.
//! - **`links`**: Symbolic link detection and dereferencing. Used by the archive
//!   traversal for every visited node.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::{io, links};
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! let target = io::with_zip_extension(Path::new("out"));
//! io::ensure_parent_dir(&target)?;
//! let resolved = links::resolve(Path::new("proj/link.txt"))?;
//! # Ok(())
//! # }
//! ```
//!

/// Destination pre-flight helpers (e.g., `with_zip_extension`, `ensure_parent_dir`).
pub mod io;
/// Symbolic link resolution (`resolve`).
pub mod links;
