//! # create-zip Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module holds the command handlers invoked from `main.rs`. The tool
//! performs one operation, so there is a single command module.
//!
//! ## Commands
//!
//! - `create`: Validate inputs, prepare the destination and build the archive
//!

/// Arguments and handler for creating an archive (`CreateArgs`, `handle_create`).
pub mod create;
