//! # create-zip Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!

//! ## Overview
//!
//! This module is the root of the shared functionality used by the `create`
//! command: the archive engine itself and the filesystem helpers around it.
//!
//! ## Architecture
//!
//! - **`archive`**: The archive-assembly engine: traversal, entry naming and the ZIP writer.
//! - **`fs`**: Destination pre-flight helpers and symbolic link resolution.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{archive, fs};
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! let target = fs::io::with_zip_extension(Path::new("out"));
//! fs::io::ensure_parent_dir(&target)?;
//! archive::archive(Path::new("proj"), &target)?;
//! # Ok(())
//! # }
//! ```
//!

/// The archive-assembly engine (traversal, naming, ZIP writing).
pub mod archive;
/// Filesystem helpers (destination pre-flight, symlink resolution).
pub mod fs;
