//! # create-zip Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by the command and the
//! archive engine.
//!
//! ## Architecture
//!
//! - `config`: Resolving `source_path` / `target_dir` from arguments, environment
//!   and TOML files, then validating them
//! - `error`: The archive engine's error taxonomy and the application error type
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{ArchiveError, CreateZipError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
